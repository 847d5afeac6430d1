mod common;
mod cohort;
