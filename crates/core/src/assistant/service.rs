//! Assistant service - prompt construction and reply shaping
//!
//! Four operations share one completion port and differ in the system
//! preamble, token budget, and temperature. Replies are tagged with a kind
//! and follow-up suggestion chips for the client to render.

use std::fmt;
use std::sync::Arc;

use learnarc_domain::{DailyActivity, Result, UserStats};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ports::{CompletionClient, CompletionRequest};

const CHAT_MAX_TOKENS: u32 = 1000;
const STUDY_PLAN_MAX_TOKENS: u32 = 1500;
const ANALYSIS_MAX_TOKENS: u32 = 1200;
const RECOMMENDATIONS_MAX_TOKENS: u32 = 1200;

/// What shape of answer a reply carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Text,
    StudyPlan,
    Recommendations,
    Analysis,
}

/// Self-reported skill level used by plan and recommendation prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beginner => write!(f, "beginner"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

/// Assistant reply: free text plus UI affordances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub content: String,
    pub kind: ReplyKind,
    pub suggestions: Vec<String>,
}

/// User context woven into every prompt.
#[derive(Debug, Clone, Default)]
pub struct AssistantContext {
    pub stats: UserStats,
    /// Titles of recently watched videos, newest first.
    pub recent_videos: Vec<String>,
}

/// Assistant service over a completion provider.
pub struct AssistantService {
    client: Arc<dyn CompletionClient>,
}

impl AssistantService {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Free-form chat with the learning assistant persona.
    pub async fn chat(&self, message: &str, context: &AssistantContext) -> Result<AssistantReply> {
        let request = CompletionRequest {
            system: persona_prompt(context),
            user: message.to_string(),
            max_tokens: CHAT_MAX_TOKENS,
            temperature: 0.7,
        };
        let reply = self.client.complete(request).await?;
        info!(tokens = reply.total_tokens, "assistant chat complete");

        let (kind, suggestions) = classify_reply(message);
        Ok(AssistantReply { content: reply.content, kind, suggestions })
    }

    /// Generate a structured study plan for a topic.
    pub async fn study_plan(
        &self,
        topic: &str,
        skill_level: SkillLevel,
        timeframe: &str,
        context: &AssistantContext,
    ) -> Result<AssistantReply> {
        let stats = &context.stats;
        let user = format!(
            "Create a detailed study plan for learning {topic} at {skill_level} level over {timeframe}.\n\n\
             User's current progress:\n\
             - Total watch time: {:.0} minutes\n\
             - Completed videos: {}\n\
             - Current streak: {} days\n\n\
             Format the response as a structured study plan with:\n\
             1. Weekly breakdown\n\
             2. Specific topics to cover\n\
             3. Recommended video types\n\
             4. Practice exercises\n\
             5. Milestones and checkpoints\n\n\
             Make it personalized and actionable.",
            stats.total_watch_secs / 60.0,
            stats.completed_videos,
            stats.current_streak,
        );
        let request = CompletionRequest {
            system: "You are an expert learning advisor specializing in creating personalized \
                     study plans for online video-based learning."
                .to_string(),
            user,
            max_tokens: STUDY_PLAN_MAX_TOKENS,
            temperature: 0.6,
        };
        let reply = self.client.complete(request).await?;

        Ok(AssistantReply {
            content: reply.content,
            kind: ReplyKind::StudyPlan,
            suggestions: vec![
                "Adjust timeline".into(),
                "Add more topics".into(),
                "Focus on practical projects".into(),
                "Include assessment methods".into(),
            ],
        })
    }

    /// Analyze progress against recent activity.
    pub async fn analyze_progress(
        &self,
        context: &AssistantContext,
        recent: &[DailyActivity],
    ) -> Result<AssistantReply> {
        let stats = &context.stats;
        let activity_lines = recent
            .iter()
            .map(|activity| {
                format!(
                    "- {} ({})",
                    activity.video.title,
                    if activity.completed { "Completed" } else { "In Progress" }
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let user = format!(
            "Analyze this user's learning progress and provide insights:\n\n\
             Statistics:\n\
             - Total watch time: {:.0} minutes\n\
             - Completed videos: {}\n\
             - Current streak: {} days\n\
             - Longest streak: {} days\n\n\
             Recent Activities:\n{activity_lines}\n\n\
             Provide:\n\
             1. Strengths and achievements\n\
             2. Areas for improvement\n\
             3. Personalized recommendations\n\
             4. Motivation and encouragement\n\
             5. Specific next steps\n\n\
             Be encouraging but honest about areas that need work.",
            stats.total_watch_secs / 60.0,
            stats.completed_videos,
            stats.current_streak,
            stats.longest_streak,
        );
        let request = CompletionRequest {
            system: "You are a supportive learning analytics expert who helps students \
                     understand their progress and improve their learning strategies."
                .to_string(),
            user,
            max_tokens: ANALYSIS_MAX_TOKENS,
            temperature: 0.7,
        };
        let reply = self.client.complete(request).await?;

        Ok(AssistantReply {
            content: reply.content,
            kind: ReplyKind::Analysis,
            suggestions: vec![
                "Set new goals".into(),
                "View detailed metrics".into(),
                "Compare with benchmarks".into(),
                "Export progress report".into(),
            ],
        })
    }

    /// Recommend videos and channels from interests and viewing history.
    pub async fn recommendations(
        &self,
        interests: &[String],
        skill_level: SkillLevel,
        context: &AssistantContext,
    ) -> Result<AssistantReply> {
        let user = format!(
            "Based on this user's learning profile, recommend specific YouTube videos/channels:\n\n\
             Interests: {}\n\
             Skill Level: {skill_level}\n\
             Recently Watched: {}\n\n\
             Provide:\n\
             1. 5-7 specific video recommendations with titles and channel names\n\
             2. Brief explanation of why each video is recommended\n\
             3. Suggested viewing order\n\
             4. Expected learning outcomes\n\n\
             Focus on high-quality educational content that builds on their current knowledge.",
            interests.join(", "),
            context.recent_videos.join(", "),
        );
        let request = CompletionRequest {
            system: "You are an expert curator of educational YouTube content with deep \
                     knowledge of programming, technology, and online learning resources."
                .to_string(),
            user,
            max_tokens: RECOMMENDATIONS_MAX_TOKENS,
            temperature: 0.6,
        };
        let reply = self.client.complete(request).await?;

        Ok(AssistantReply {
            content: reply.content,
            kind: ReplyKind::Recommendations,
            suggestions: vec![
                "Search for these videos".into(),
                "Create playlist".into(),
                "Adjust difficulty level".into(),
                "Find similar content".into(),
            ],
        })
    }
}

fn persona_prompt(context: &AssistantContext) -> String {
    let stats = &context.stats;
    let recent = if context.recent_videos.is_empty() {
        "None".to_string()
    } else {
        context.recent_videos.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
    };

    format!(
        "You are LearnArc AI, an advanced learning assistant specializing in YouTube-based \
         education. You help users optimize their learning journey through personalized \
         guidance, progress analysis, and smart recommendations.\n\n\
         User Context:\n\
         - Total watch time: {:.0} minutes\n\
         - Completed videos: {}\n\
         - Current streak: {} days\n\
         - Recent videos: {recent}\n\n\
         Your capabilities:\n\
         1. Create personalized study plans\n\
         2. Analyze learning progress and patterns\n\
         3. Recommend specific YouTube videos and channels\n\
         4. Provide learning strategies and tips\n\
         5. Help set and track learning goals\n\
         6. Offer motivation and encouragement\n\n\
         Always be encouraging, specific, and focused on practical learning outcomes. \
         Format responses clearly with headings, bullet points, and actionable advice.",
        stats.total_watch_secs / 60.0,
        stats.completed_videos,
        stats.current_streak,
    )
}

/// Infer the reply shape and suggestion chips from the user's message.
fn classify_reply(message: &str) -> (ReplyKind, Vec<String>) {
    let lower = message.to_lowercase();

    if lower.contains("study plan") || lower.contains("plan") {
        (
            ReplyKind::StudyPlan,
            vec![
                "Adjust timeline".into(),
                "Add more topics".into(),
                "Focus on specific areas".into(),
                "Create daily schedule".into(),
            ],
        )
    } else if lower.contains("recommend") || lower.contains("video") {
        (
            ReplyKind::Recommendations,
            vec![
                "Search for videos".into(),
                "Create playlist".into(),
                "Filter by difficulty".into(),
                "Find similar content".into(),
            ],
        )
    } else if lower.contains("progress") || lower.contains("analyze") {
        (
            ReplyKind::Analysis,
            vec![
                "Set new goals".into(),
                "View detailed stats".into(),
                "Compare progress".into(),
                "Export report".into(),
            ],
        )
    } else {
        (
            ReplyKind::Text,
            vec![
                "Create study plan".into(),
                "Analyze progress".into(),
                "Get recommendations".into(),
                "Set learning goals".into(),
            ],
        )
    }
}
