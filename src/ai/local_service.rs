
use async_trait::async_trait;
use std::time::Instant;
use tokio::time::{sleep, Duration};

use crate::error::AIError;
use crate::game::GameState;

use super::service::{AIMoveResult, AIService, AIServiceType};
use super::strategies::MinimaxAI;

#[derive(Debug, Clone)]
pub struct LocalAIService {
    pub simulate_thinking_time: bool,
    pub thinking_time_ms: u64,
}

impl LocalAIService {
    pub fn new() -> Self {
        Self {
            simulate_thinking_time: true,
            thinking_time_ms: 300,
        }
    }

    pub fn new_fast() -> Self {
        Self {
            simulate_thinking_time: false,
            thinking_time_ms: 0,
        }
    }

    fn get_thinking_time(&self) -> u64 {
        if self.simulate_thinking_time {
            self.thinking_time_ms
        } else {
            0
        }
    }
}

impl Default for LocalAIService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AIService for LocalAIService {
    async fn calculate_move(&self, game_state: &GameState) -> Result<AIMoveResult, AIError> {
        let start_time = Instant::now();

        if game_state.is_finished() {
            return Err(AIError::StrategyError {
                message: "Cannot calculate move for finished game".to_string(),
            });
        }

        let thinking_time_ms = self.get_thinking_time();
        if thinking_time_ms > 0 {
            sleep(Duration::from_millis(thinking_time_ms)).await;
        }

        let search = MinimaxAI::search(&game_state.board)?;

        let actual_thinking_time = start_time.elapsed().as_millis() as u64;

        Ok(AIMoveResult {
            square: search.square,
            thinking_time_ms: actual_thinking_time,
            evaluation_score: Some(search.score),
            nodes_evaluated: Some(search.nodes_visited),
        })
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn get_name(&self) -> &'static str {
        "LocalAIService"
    }

    fn get_service_type(&self) -> AIServiceType {
        AIServiceType::Local
    }
}
