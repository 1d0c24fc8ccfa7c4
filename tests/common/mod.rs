use procsim::SimFormat;

/// Install the simulated-time log formatter for the test binary.
///
/// `try_init` keeps repeated calls from panicking when several tests in
/// the same binary set up logging.
pub fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .event_format(SimFormat)
        .try_init();
}
