#![allow(dead_code)]

mod builders;

pub use builders::{client, groups_from};
