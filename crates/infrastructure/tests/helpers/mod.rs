#![allow(dead_code)]

mod builders;
mod mock_next_resolver;

pub use builders::{a, custom_dns, request, request_from};
pub use mock_next_resolver::{MockNextResolver, RecordedCall};
