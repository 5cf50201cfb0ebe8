//! Backend status command implementation.

use crate::output::Formatter;
use digest_domain::LlmProvider;
use digest_llm::LlmError;
use tracing::debug;

/// Report whether the backend is reachable and which model it serves.
///
/// Returns `true` when the backend answered its probe.
pub fn execute_check_server<L>(provider: &L, formatter: &Formatter) -> bool
where
    L: LlmProvider<Error = LlmError>,
{
    println!("{}", formatter.info(&format!("Checking {}...", provider.name())));

    if let Err(e) = provider.check_available() {
        println!("{}", formatter.error(&format!("{} not reachable: {}", provider.name(), e)));
        for line in provider.setup_hint().lines() {
            println!("{}", formatter.detail(line));
        }
        return false;
    }
    println!("{}", formatter.success("Server is running and responsive"));

    match provider.list_models() {
        Ok(models) => {
            if let Some(model) = models.first() {
                println!("{}", formatter.info(&format!("Loaded model: {}", model)));
            }
        }
        Err(e) => debug!("Could not list models: {}", e),
    }
    true
}
