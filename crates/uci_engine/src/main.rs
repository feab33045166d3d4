mod session;

use std::io::{self, BufRead};

use shashin_engine::{MctsConfig, ShashinEngine, TracingSink};
use tracing_subscriber::EnvFilter;

use crate::session::UciSession;

fn main() -> io::Result<()> {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut engine = ShashinEngine::new(MctsConfig::default());
    engine.add_sink(Box::new(TracingSink));
    let mut session = UciSession::new(engine);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        if !session.handle(&line?, &mut stdout)? {
            break;
        }
    }
    Ok(())
}
