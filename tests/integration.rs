//! Integration test harness: full HTTP round-trips through the real
//! router against the in-memory store.

mod integration {
    pub mod helpers;

    mod auth_test;
    mod job_test;
    mod printer_test;
}
