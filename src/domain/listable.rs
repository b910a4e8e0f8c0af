use chrono::{DateTime, Utc};

/// Read-only view over a record that can be shown in a filterable, sortable list.
pub trait Listable {
    fn id(&self) -> &str;
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn likes(&self) -> u32;
}
