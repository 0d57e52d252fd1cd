//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::survey::SurveyVariant;

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to listen on (overrides `server.bind`)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,
}

/// Link command arguments.
#[derive(Debug, Args)]
pub struct LinkCommand {
    /// Contact to build the survey link for
    pub contact_id: String,

    /// Which survey to link to
    #[arg(short = 't', long = "type", value_enum, default_value = "attendee")]
    pub survey_type: SurveyTypeArg,

    /// Meeting date to carry in the link (defaults to today's date)
    #[arg(short, long)]
    pub date: Option<String>,
}

/// Contact commands.
#[derive(Debug, Subcommand)]
pub enum ContactsCommand {
    /// Add a contact to the local store
    Add {
        /// First name
        #[arg(long)]
        first_name: String,

        /// Last name
        #[arg(long)]
        last_name: String,

        /// Company name
        #[arg(long)]
        company: Option<String>,
    },

    /// Show a contact and its notes
    Show {
        /// Contact identifier
        id: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Survey type argument for links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SurveyTypeArg {
    /// Feedback from the attendee
    #[default]
    Attendee,
    /// Notes from the host
    Host,
}

impl From<SurveyTypeArg> for SurveyVariant {
    fn from(arg: SurveyTypeArg) -> Self {
        match arg {
            SurveyTypeArg::Attendee => Self::Attendee,
            SurveyTypeArg::Host => Self::Host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survey_type_arg_conversion() {
        assert_eq!(
            SurveyVariant::from(SurveyTypeArg::Attendee),
            SurveyVariant::Attendee
        );
        assert_eq!(SurveyVariant::from(SurveyTypeArg::Host), SurveyVariant::Host);
    }

    #[test]
    fn test_survey_type_arg_default() {
        assert_eq!(SurveyTypeArg::default(), SurveyTypeArg::Attendee);
    }

    #[test]
    fn test_contacts_command_debug() {
        let cmd = ContactsCommand::Show {
            id: "c-1".to_string(),
            json: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
        assert!(debug_str.contains("c-1"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
