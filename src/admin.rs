//! Admin command processor — PAUSE / RESUME / STATS / HELP / STATUS.
//!
//! Pure text classification and canned replies. Persisting a pause or resume
//! is the caller's job.

use chrono::Utc;

use crate::business::{Business, BusinessStatus};

/// A recognized owner control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    Pause,
    Resume,
    Stats,
    Help,
    Status,
}

impl AdminCommand {
    /// Parse a message as a command: exact match after trimming, any case.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_uppercase().as_str() {
            "PAUSE" => Some(Self::Pause),
            "RESUME" => Some(Self::Resume),
            "STATS" => Some(Self::Stats),
            "HELP" => Some(Self::Help),
            "STATUS" => Some(Self::Status),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pause => "PAUSE",
            Self::Resume => "RESUME",
            Self::Stats => "STATS",
            Self::Help => "HELP",
            Self::Status => "STATUS",
        }
    }
}

impl std::fmt::Display for AdminCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const PAUSE_REPLY: &str = "⏸️ AI Assistant paused.\n\nCustomers will receive: 'We're temporarily unavailable. We'll respond soon!'\n\nSend RESUME to reactivate.";

const RESUME_REPLY: &str = "▶️ AI Assistant resumed!\n\nYour AI is now responding to customers again.\n\nSend STATS to see recent activity.";

const STATS_REPLY: &str = "📊 TODAY'S STATS:\n\n✉️ Messages: 23\n👥 Customers: 8\n⏱️ Avg response: 1.9s\n💰 Orders: 3 (₦15,000)\n\nMost asked: \"What do you have?\"\n\nAI is active ✅";

const HELP_REPLY: &str = "🆘 HELP & SUPPORT:\n\n📞 Call: 2348012345678\n💬 WhatsApp: 2348012345678\n📧 Email: help@odia.dev\n\nCommands:\nPAUSE - Stop AI responses\nRESUME - Start AI responses\nSTATS - View daily statistics\n\nNeed human support? Just ask!";

const STATUS_REPLY: &str = "📋 ACCOUNT STATUS:\n\n🎯 Plan: 7-day FREE trial\n📅 Trial ends: 5 days left\n💳 Payment: Not required yet\n🤖 AI Status: Active\n\n24/7 customer service running!";

const UNKNOWN_REPLY: &str = "❌ Unknown command.\n\nAvailable commands:\nPAUSE, RESUME, STATS, HELP, STATUS\n\nOr just ask for help!";

/// Whether `text` is one of the fixed admin commands.
pub fn is_admin_command(text: &str) -> bool {
    AdminCommand::parse(text).is_some()
}

/// Canned reply for `command`; an unknown command gets the list of valid ones.
///
/// With a business as context, STATUS reports that business's plan and
/// trial instead of the generic text.
pub fn process_admin_command(command: &str, context: Option<&Business>) -> String {
    match AdminCommand::parse(command) {
        Some(AdminCommand::Pause) => PAUSE_REPLY.to_string(),
        Some(AdminCommand::Resume) => RESUME_REPLY.to_string(),
        Some(AdminCommand::Stats) => STATS_REPLY.to_string(),
        Some(AdminCommand::Help) => HELP_REPLY.to_string(),
        Some(AdminCommand::Status) => match context {
            Some(business) => status_reply(business),
            None => STATUS_REPLY.to_string(),
        },
        None => UNKNOWN_REPLY.to_string(),
    }
}

fn status_reply(business: &Business) -> String {
    let now = Utc::now();
    let (plan, ends, payment) = match business.status {
        BusinessStatus::Trial => {
            let days = business.trial_days_left(now);
            let unit = if days == 1 { "day" } else { "days" };
            (
                format!("{}-day FREE trial", business.trial_length_days()),
                format!("{days} {unit} left"),
                "Not required yet",
            )
        }
        BusinessStatus::Active => (
            "Monthly".to_string(),
            "Active subscription".to_string(),
            "Up to date",
        ),
        BusinessStatus::Paused => ("Monthly".to_string(), "Paused".to_string(), "Up to date"),
        BusinessStatus::Expired => (
            "Trial ended".to_string(),
            "Expired".to_string(),
            "Required to continue",
        ),
    };
    let ai_status = if business.status.is_responding() {
        "Active"
    } else {
        "Inactive"
    };
    format!(
        "📋 ACCOUNT STATUS: {}\n\n🎯 Plan: {plan}\n📅 Trial ends: {ends}\n💳 Payment: {payment}\n🤖 AI Status: {ai_status}",
        business.name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::business::BusinessDraft;

    fn business(status: BusinessStatus) -> Business {
        let mut business = Business::from_draft(
            "2348000000000",
            BusinessDraft {
                business_type: "1".into(),
                name: "Mama Nkechi Boutique".into(),
                category: "Women's clothing".into(),
                has_delivery: true,
                hours: "8am - 6pm".into(),
            },
            Utc::now(),
            7,
        );
        business.status = status;
        business
    }

    #[test]
    fn recognizes_commands_case_and_whitespace_insensitive() {
        assert_eq!(AdminCommand::parse("  pause \n"), Some(AdminCommand::Pause));
        assert_eq!(AdminCommand::parse("Resume"), Some(AdminCommand::Resume));
        assert_eq!(AdminCommand::parse("\tSTATS"), Some(AdminCommand::Stats));
        assert!(is_admin_command("help"));
        assert!(is_admin_command("StAtUs  "));
    }

    #[test]
    fn rejects_non_commands() {
        for text in ["pause please", "PAUSED", "", "stat", "help me"] {
            assert!(!is_admin_command(text), "{text:?}");
        }
    }

    #[test]
    fn each_command_has_its_reply() {
        assert!(process_admin_command("pause", None).starts_with("⏸️ AI Assistant paused."));
        assert!(process_admin_command("RESUME", None).starts_with("▶️ AI Assistant resumed!"));
        assert!(process_admin_command("stats", None).contains("TODAY'S STATS"));
        assert!(process_admin_command("help", None).contains("HELP & SUPPORT"));
        assert!(process_admin_command("status", None).contains("5 days left"));
    }

    #[test]
    fn unknown_command_lists_valid_ones() {
        let reply = process_admin_command("REBOOT", None);
        assert!(reply.starts_with("❌ Unknown command."));
        assert!(reply.contains("PAUSE, RESUME, STATS, HELP, STATUS"));
    }

    #[test]
    fn status_with_business_context() {
        let reply = process_admin_command("STATUS", Some(&business(BusinessStatus::Trial)));
        assert!(reply.contains("Mama Nkechi Boutique"));
        assert!(reply.contains("7 days left"));
        assert!(reply.contains("AI Status: Active"));

        let reply = process_admin_command("STATUS", Some(&business(BusinessStatus::Paused)));
        assert!(reply.contains("AI Status: Inactive"));
    }

    #[test]
    fn status_quotes_the_business_trial_length() {
        let now = Utc::now();
        let mut business = business(BusinessStatus::Trial);
        business.created_at = now;
        business.trial_ends_at = now + chrono::Duration::days(14);

        let reply = process_admin_command("STATUS", Some(&business));
        assert!(reply.contains("🎯 Plan: 14-day FREE trial"));
        assert!(reply.contains("14 days left"));
    }

    #[test]
    fn display_is_upper_case() {
        assert_eq!(AdminCommand::Status.to_string(), "STATUS");
    }
}
