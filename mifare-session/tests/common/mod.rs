// Shared across the aggregated test files; not every copy uses every helper.
#![allow(dead_code)]

pub mod fixtures;
