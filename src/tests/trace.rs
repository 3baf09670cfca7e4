use super::*;

#[test]
fn macros_accept_structured_fields() {
    let rules = 3usize;
    trace!(rules, "trace message");
    debug!(rules, "debug message");
    info!("info message");
    warn!(reason = "budget", "warn message");

    let _span = debug_span!("complete", max_iterations = 16).entered();
    let _ = rules;
}

#[test]
fn init_subscriber_is_idempotent() {
    init_subscriber();
    init_subscriber();
}
