pub mod labels;
pub mod matcher;
pub mod pipeline;
pub mod targets;

pub use labels::{merge_labels, LabelSet, HYPERVISOR_LABEL};
pub use matcher::Pattern;
pub use pipeline::{build_records, collect_inventory, discover_host, HostInventory, HostOutcome};
pub use targets::{build_record, build_targets, ScrapeRecord};
