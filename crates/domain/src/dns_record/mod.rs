pub mod name;
pub mod record;
pub mod record_set;
pub mod record_type;

pub use name::{fqdn, normalize_domain, parent_domain, reverse_name, trim_root};
pub use record::{RecordData, ResourceRecord, TxtStrings};
pub use record_set::{DomainEntry, DomainRecordSet};
pub use record_type::RecordType;
