//! Console output formatter for the board's decision

use colored::Colorize;
use council_domain::BoardResult;

/// Formats a board result as a decision card for the console
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete decision card
    pub fn format(board: &BoardResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("The Council Has Decided"));
        output.push('\n');

        output.push_str(&format!(
            "{}\n{}\n",
            "Executive Summary".cyan().bold(),
            board.executive_summary
        ));

        if !board.strategic_options.is_empty() {
            output.push_str(&format!("\n{}\n", "Strategic Options".cyan().bold()));
            for (idx, option) in board.strategic_options.iter().enumerate() {
                output.push_str(&format!(
                    "\n{}\n",
                    format!("{}. {}", idx + 1, option.option).yellow().bold()
                ));
                output.push_str(&format!("  {} {}\n", "+".green().bold(), option.pros));
                output.push_str(&format!("  {} {}\n", "-".red().bold(), option.cons));
                if !option.backing_evidence.is_empty() {
                    output.push_str(&format!(
                        "  {} {}\n",
                        "Evidence:".dimmed(),
                        option.backing_evidence
                    ));
                }
            }
        }

        if !board.risks_to_address.is_empty() {
            output.push_str(&format!("\n{}\n", "Risks to Address".yellow().bold()));
            for risk in &board.risks_to_address {
                output.push_str(&format!("  * {}\n", risk));
            }
        }

        output.push_str(&format!(
            "\n{}\n{}\n",
            "Final Verdict".green().bold(),
            board.final_verdict
        ));

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(board: &BoardResult) -> String {
        serde_json::to_string_pretty(board).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        format!("\n{}\n", format!("=== {} ===", title).cyan().bold())
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(50).dimmed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::StrategicOption;

    fn sample() -> BoardResult {
        BoardResult {
            executive_summary: "Expand cautiously.".to_string(),
            strategic_options: vec![StrategicOption {
                option: "Pilot first".to_string(),
                pros: "Low risk".to_string(),
                cons: "Slower".to_string(),
                backing_evidence: "Survey data".to_string(),
            }],
            risks_to_address: vec!["Churn".to_string()],
            final_verdict: "Run the pilot.".to_string(),
            raw_output: None,
        }
    }

    #[test]
    fn card_contains_all_sections() {
        colored::control::set_override(false);
        let card = ConsoleFormatter::format(&sample());
        assert!(card.contains("Expand cautiously."));
        assert!(card.contains("Pilot first"));
        assert!(card.contains("Low risk"));
        assert!(card.contains("Churn"));
        assert!(card.contains("Run the pilot."));
    }

    #[test]
    fn json_round_trips() {
        let json = ConsoleFormatter::format_json(&sample());
        let parsed: BoardResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
    }
}
