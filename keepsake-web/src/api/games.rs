//! Mini-game configuration endpoints
//!
//! Both games are static fixed-data toggles: the memory game is a shuffled
//! deck of emoji pairs, the quiz a fixed four-question configuration. The
//! shuffle is unseeded; no determinism is promised.

use axum::{routing::get, Json, Router};
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::AppState;

/// Emoji used for the memory-match pairs
const MEMORY_EMOJIS: [&str; 8] = ["❤️", "💖", "💘", "💝", "💕", "💓", "💗", "💞"];

#[derive(Debug, Serialize)]
pub struct MemoryCard {
    pub id: usize,
    pub emoji: String,
}

#[derive(Debug, Serialize)]
pub struct MemoryDeck {
    pub cards: Vec<MemoryCard>,
}

/// GET /api/games/memory
///
/// A freshly shuffled 4x4 deck: each emoji appears exactly twice.
pub async fn memory_deck() -> Json<MemoryDeck> {
    let mut emojis: Vec<&str> = MEMORY_EMOJIS.iter().chain(MEMORY_EMOJIS.iter()).copied().collect();
    emojis.shuffle(&mut rand::thread_rng());

    let cards = emojis
        .into_iter()
        .enumerate()
        .map(|(id, emoji)| MemoryCard {
            id,
            emoji: emoji.to_string(),
        })
        .collect();

    Json(MemoryDeck { cards })
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_answer: usize,
}

#[derive(Debug, Serialize)]
pub struct QuizConfig {
    pub questions: Vec<QuizQuestion>,
}

/// Placeholder quiz content, meant to be customized by the site owner
fn quiz_questions() -> Vec<QuizQuestion> {
    let q = |id, question: &str, options: [&str; 4], correct_answer| QuizQuestion {
        id,
        question: question.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer,
    };

    vec![
        q(
            1,
            "Where did we first meet?",
            ["At the fort", "At the palace", "At the park", "At the station"],
            1,
        ),
        q(
            2,
            "What's my favorite food?",
            ["Coffee", "Pizza", "Biryani", "Noodles"],
            2,
        ),
        q(
            3,
            "What's your favorite color?",
            ["Blue", "Red", "Green", "Purple"],
            3,
        ),
        q(
            4,
            "What's our favorite memory?",
            ["First message", "The trip", "Video calls", "Game nights"],
            1,
        ),
    ]
}

/// GET /api/games/quiz
pub async fn quiz_config() -> Json<QuizConfig> {
    Json(QuizConfig {
        questions: quiz_questions(),
    })
}

/// Build game routes
pub fn game_routes() -> Router<AppState> {
    Router::new()
        .route("/api/games/memory", get(memory_deck))
        .route("/api/games/quiz", get(quiz_config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn deck_has_sixteen_cards_in_exact_pairs() {
        let Json(deck) = memory_deck().await;
        assert_eq!(deck.cards.len(), 16);

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for card in &deck.cards {
            *counts.entry(card.emoji.as_str()).or_default() += 1;
        }
        assert_eq!(counts.len(), 8);
        assert!(counts.values().all(|&n| n == 2));

        // Card ids are positions, so the client can address any cell
        let ids: Vec<usize> = deck.cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, (0..16).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn quiz_has_four_questions_with_valid_answers() {
        let Json(config) = quiz_config().await;
        assert_eq!(config.questions.len(), 4);
        for question in &config.questions {
            assert_eq!(question.options.len(), 4);
            assert!(question.correct_answer < question.options.len());
        }
    }
}
