// Output renderers: concrete exporters for the formats the pipeline writes.

pub mod tabular;
pub mod xlsx;
