mod property_partition;
mod regressions;
mod support;
