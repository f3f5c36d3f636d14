pub mod occurrences;
