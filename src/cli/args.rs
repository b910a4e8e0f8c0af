// src/cli/args.rs
use crate::domain::SkillLevel;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to config file (default: <config dir>/skillboard/config.toml)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Server base URL, overrides the config file
    #[arg(short = 'u', long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in and remember the session token
    Login {
        #[arg(value_name = "USERNAME")]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Browse and share ideas
    #[command(subcommand)]
    Ideas(IdeasCommand),

    /// Read and write comments on an idea
    #[command(subcommand)]
    Comments(CommentsCommand),

    /// Show and acknowledge notifications
    #[command(subcommand)]
    Notifications(NotificationsCommand),

    /// Browse and add skills
    #[command(subcommand)]
    Skills(SkillsCommand),

    /// Show or edit your profile
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ListOptions {
    /// Only show entries whose title or description contains this text
    #[arg(short, long, value_name = "TERM", default_value = "")]
    pub search: String,

    /// newest, oldest, mostLiked, titleAZ or titleZA
    #[arg(long, value_name = "KEY", default_value = "newest")]
    pub sort: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum IdeasCommand {
    /// List ideas
    List {
        #[command(flatten)]
        options: ListOptions,

        /// Output ideas as JSON
        #[arg(long, conflicts_with = "html")]
        json: bool,

        /// Open the board in the browser
        #[arg(long)]
        html: bool,
    },

    /// Show one idea with its comments
    Show {
        #[arg(value_name = "IDEA_ID")]
        id: String,
    },

    /// Share a new idea
    Create {
        title: String,
        description: String,

        /// Image or video to attach
        #[arg(short, long, value_name = "FILE")]
        media: Option<PathBuf>,
    },

    /// Replace title and description of an idea
    Update {
        #[arg(value_name = "IDEA_ID")]
        id: String,
        title: String,
        description: String,

        #[arg(short, long, value_name = "FILE")]
        media: Option<PathBuf>,
    },

    /// Delete an idea
    Delete {
        #[arg(value_name = "IDEA_ID")]
        id: String,
    },

    /// Like an idea, or unlike it when already liked
    Like {
        #[arg(value_name = "IDEA_ID")]
        id: String,
    },

    /// Re-fetch and print the list on every poll until interrupted
    Watch {
        #[command(flatten)]
        options: ListOptions,

        /// Seconds between polls, overrides the config file
        #[arg(short, long, value_name = "SECS")]
        interval: Option<u64>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum CommentsCommand {
    /// List comments on an idea, newest first
    List {
        #[arg(value_name = "IDEA_ID")]
        idea_id: String,
    },

    /// Comment on an idea
    Add {
        #[arg(value_name = "IDEA_ID")]
        idea_id: String,
        content: String,

        /// Display name (default: Anonymous)
        #[arg(short, long)]
        author: Option<String>,
    },

    /// Delete a comment
    Delete {
        #[arg(value_name = "IDEA_ID")]
        idea_id: String,
        #[arg(value_name = "COMMENT_ID")]
        comment_id: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum NotificationsCommand {
    /// List notifications
    List {
        /// Open the list in the browser
        #[arg(long)]
        html: bool,
    },

    /// Print the unread count
    Unread,

    /// Mark one notification as read
    Read {
        #[arg(value_name = "NOTIFICATION_ID")]
        id: String,
    },

    /// Mark all notifications as read
    ReadAll,

    /// Print the unread count on every poll until interrupted
    Watch {
        /// Seconds between polls, overrides the config file
        #[arg(short, long, value_name = "SECS")]
        interval: Option<u64>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum SkillsCommand {
    /// List skills
    List {
        #[command(flatten)]
        options: ListOptions,
    },

    /// Add a skill
    Add {
        title: String,
        description: String,

        #[arg(long)]
        category: String,

        /// beginner, intermediate, advanced or expert
        #[arg(short, long, default_value = "beginner")]
        level: SkillLevel,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommand {
    /// Show your profile
    Show,

    /// Change profile fields; omitted fields stay as they are
    Update {
        #[arg(long)]
        full_name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        bio: Option<String>,

        /// URL of the profile picture
        #[arg(long)]
        picture: Option<String>,
    },
}
