// src/ports/text.rs
use crate::application::CommentThread;
use crate::constants::LIST_SUMMARY_CHARS;
use crate::domain::{Idea, Notification, Profile, Skill};
use crate::ports::html::{IdeaCard, EMPTY_BOARD_MESSAGE};
use crate::util::text::summary_line;
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// `Mar 1, 2024, 12:00 PM`
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y, %I:%M %p").to_string()
}

fn plural(n: i64, unit: &str) -> String {
    format!("{n} {unit}{} ago", if n == 1 { "" } else { "s" })
}

/// Age of `at` relative to `now` in whole minutes, hours or days.
pub fn relative_time(at: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - *at).num_minutes().max(0);
    let hours = minutes / 60;
    if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else {
        plural(hours / 24, "day")
    }
}

/// Plain-text rendering for the terminal.
#[derive(Debug, Default)]
pub struct TextPresenter;

impl TextPresenter {
    pub fn new() -> Self {
        Self
    }

    /// One line per idea: id, like marker and count, title, description summary.
    pub fn idea_list(&self, cards: &[IdeaCard<'_>]) -> String {
        if cards.is_empty() {
            return format!("{EMPTY_BOARD_MESSAGE}\n");
        }
        let mut out = String::new();
        for card in cards {
            let marker = if card.liked { '♥' } else { '♡' };
            let _ = writeln!(
                out,
                "{}\t{marker} {}\t{}\t{}",
                card.idea.id,
                card.idea.likes_count,
                card.idea.title,
                summary_line(&card.idea.description, LIST_SUMMARY_CHARS),
            );
        }
        out
    }

    pub fn idea_detail(&self, idea: &Idea, liked: bool, thread: Option<&CommentThread>) -> String {
        let mut out = format!("{}\n\n{}\n\n", idea.title, idea.description);
        if let Some(media) = idea.media() {
            let _ = writeln!(out, "Media ({:?}): {}", media.kind, media.url);
        }
        let _ = writeln!(out, "Posted on {}", format_timestamp(&idea.created_at));
        let _ = writeln!(
            out,
            "Likes: {}{}",
            idea.likes_count,
            if liked { " (liked)" } else { "" }
        );
        if let Some(thread) = thread {
            let _ = writeln!(out, "\nComments ({})", thread.count());
            if let Some(placeholder) = thread.placeholder() {
                let _ = writeln!(out, "  {placeholder}");
            }
            for comment in thread.comments() {
                let _ = writeln!(
                    out,
                    "  [{}] {} ({}): {}",
                    comment.id,
                    comment.author,
                    format_timestamp(&comment.created_at),
                    comment.content
                );
            }
        }
        out
    }

    pub fn notifications(&self, notifications: &[Notification], now: DateTime<Utc>) -> String {
        if notifications.is_empty() {
            return "No notifications\n".to_string();
        }
        let mut out = String::new();
        for n in notifications {
            let _ = writeln!(
                out,
                "{} {}\t{}: {} ({})",
                if n.read { ' ' } else { '*' },
                n.id,
                n.title,
                n.message,
                relative_time(&n.created_at, now)
            );
        }
        out
    }

    pub fn skills(&self, skills: &[&Skill]) -> String {
        if skills.is_empty() {
            return "No skills yet\n".to_string();
        }
        let mut out = String::new();
        for skill in skills {
            let _ = writeln!(
                out,
                "{}\t{}\t[{}]\t{}\t{} followers",
                skill.id,
                skill.title,
                skill.level.label(),
                skill.category,
                skill.followers_count
            );
        }
        out
    }

    pub fn profile(&self, profile: &Profile) -> String {
        let mut out = format!("{} (@{})\n", profile.full_name, profile.username);
        if !profile.email.is_empty() {
            let _ = writeln!(out, "{}", profile.email);
        }
        if !profile.bio.is_empty() {
            let _ = writeln!(out, "\n{}\n", profile.bio);
        }
        let _ = writeln!(
            out,
            "{} followers, {} following",
            profile.followers_count, profile.following_count
        );
        out
    }
}
