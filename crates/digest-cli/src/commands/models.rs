//! Model listing command implementation.

use crate::error::Result;
use crate::output::Formatter;
use digest_domain::LlmProvider;
use digest_llm::LlmError;

/// Print the models the backend can serve.
pub fn execute_list_models<L>(provider: &L, formatter: &Formatter) -> Result<Vec<String>>
where
    L: LlmProvider<Error = LlmError>,
{
    let models = provider.list_models()?;

    println!("Available {} models:", provider.name());
    if models.is_empty() {
        println!("{}", formatter.warning("No models found."));
        for line in provider.setup_hint().lines() {
            println!("{}", formatter.detail(line));
        }
    } else {
        for model in &models {
            println!("  - {}", model);
        }
    }

    Ok(models)
}
