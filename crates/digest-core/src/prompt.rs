//! Prompt construction for the daily digest

/// System instruction sent alongside the digest prompt
pub const SYSTEM_INSTRUCTION: &str = "You are a personal assistant that creates concise daily browsing digests. Keep responses focused, useful, and skip fluff.";

/// Builds the digest prompt for one day of browsing
pub struct DigestPrompt<'a> {
    date: &'a str,
    content: &'a str,
}

impl<'a> DigestPrompt<'a> {
    /// Create a prompt for `date` over the rendered browsing log
    pub fn new(date: &'a str, content: &'a str) -> Self {
        Self { date, content }
    }

    /// Build the complete digest prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Task
        prompt.push_str(&format!(
            "Below is a log of web pages I visited on {}. Create a 2-minute reading digest that:\n\n",
            self.date
        ));

        // 2. Required sections
        prompt.push_str(DIGEST_SECTIONS);
        prompt.push_str("\n\n");

        // 3. The browsing log
        prompt.push_str("---\nBROWSING LOG:\n");
        prompt.push_str(self.content);
        prompt.push_str("\n---\n\n");

        prompt.push_str("Now write my digest:");
        prompt
    }
}

const DIGEST_SECTIONS: &str = r#"1. **Main Themes**: What topics did I spend time on today? (2-3 bullet points)
2. **Key Insights**: What are the most important things I learned? (3-5 bullet points)
3. **Action Items**: Any tasks, ideas, or follow-ups worth noting? (if applicable)
4. **Time Analysis**: Brief observation about my browsing patterns

Keep it conversational and useful. Skip the fluff."#;
