
use async_trait::async_trait;
use std::time::Instant;
use tokio::time::{sleep, Duration};

use crate::error::AIError;
use crate::game::{GameState, Square};

use super::service::{AIMoveResult, AIService, AIServiceType};

#[derive(Debug, Clone)]
pub struct MockAIConfig {
    pub available: bool,
    pub response_time_ms: u64,
    pub should_error: bool,
    pub error_message: String,
    pub fixed_square: Option<Square>,
}

impl Default for MockAIConfig {
    fn default() -> Self {
        Self {
            available: true,
            response_time_ms: 0,
            should_error: false,
            error_message: "Mock AI error".to_string(),
            fixed_square: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockAIService {
    config: MockAIConfig,
}

impl MockAIService {
    pub fn new(config: MockAIConfig) -> Self {
        Self { config }
    }

    pub fn new_default() -> Self {
        Self::new(MockAIConfig::default())
    }

    pub fn new_unavailable() -> Self {
        Self::new(MockAIConfig {
            available: false,
            ..MockAIConfig::default()
        })
    }

    pub fn new_error(error_message: impl Into<String>) -> Self {
        Self::new(MockAIConfig {
            should_error: true,
            error_message: error_message.into(),
            ..MockAIConfig::default()
        })
    }

    pub fn new_with_fixed_square(square: Square) -> Self {
        Self::new(MockAIConfig {
            fixed_square: Some(square),
            ..MockAIConfig::default()
        })
    }

    pub fn update_config(&mut self, config: MockAIConfig) {
        self.config = config;
    }

    pub fn get_config(&self) -> &MockAIConfig {
        &self.config
    }
}

#[async_trait]
impl AIService for MockAIService {
    async fn calculate_move(&self, game_state: &GameState) -> Result<AIMoveResult, AIError> {
        let start_time = Instant::now();

        if !self.config.available {
            return Err(AIError::ServiceUnavailable {
                service_name: self.get_name().to_string(),
                reason: "Mock AI service is configured as unavailable".to_string(),
            });
        }

        if self.config.should_error {
            return Err(AIError::StrategyError {
                message: self.config.error_message.clone(),
            });
        }

        if game_state.is_finished() {
            return Err(AIError::StrategyError {
                message: "Cannot calculate move for finished game".to_string(),
            });
        }

        if self.config.response_time_ms > 0 {
            sleep(Duration::from_millis(self.config.response_time_ms)).await;
        }

        // 固定手が設定されていればそれを返し、なければ最初の空マスを返す
        let square = match self.config.fixed_square {
            Some(square) => square,
            None => game_state
                .board
                .empty_squares()
                .into_iter()
                .next()
                .ok_or(AIError::NoValidMoves)?,
        };

        Ok(AIMoveResult {
            square,
            thinking_time_ms: start_time.elapsed().as_millis() as u64,
            evaluation_score: None,
            nodes_evaluated: None,
        })
    }

    async fn is_available(&self) -> bool {
        self.config.available
    }

    fn get_name(&self) -> &'static str {
        "MockAIService"
    }

    fn get_service_type(&self) -> AIServiceType {
        AIServiceType::Mock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Player, TicTacToeRules};

    fn game_with_machine_to_move() -> GameState {
        let mut game_state = GameState::new();
        TicTacToeRules::apply_move(&mut game_state, Square::new(0).unwrap()).unwrap();
        assert_eq!(game_state.current_player, Player::O);
        game_state
    }

    #[tokio::test]
    async fn test_mock_default_returns_first_empty_square() {
        let service = MockAIService::new_default();
        let game_state = game_with_machine_to_move();

        let result = service.calculate_move(&game_state).await.unwrap();
        assert_eq!(result.square.index, 1);
    }

    #[tokio::test]
    async fn test_mock_fixed_square() {
        let square = Square::new(8).unwrap();
        let service = MockAIService::new_with_fixed_square(square);
        let game_state = game_with_machine_to_move();

        let result = service.calculate_move(&game_state).await.unwrap();
        assert_eq!(result.square, square);
    }

    #[tokio::test]
    async fn test_mock_unavailable() {
        let service = MockAIService::new_unavailable();
        let game_state = game_with_machine_to_move();

        assert!(!service.is_available().await);
        let result = service.calculate_move(&game_state).await;
        assert!(matches!(
            result,
            Err(AIError::ServiceUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_mock_forced_error() {
        let service = MockAIService::new_error("boom");
        let game_state = game_with_machine_to_move();

        let result = service.calculate_move(&game_state).await;
        if let Err(AIError::StrategyError { message }) = result {
            assert_eq!(message, "boom");
        } else {
            panic!("Expected StrategyError");
        }
    }

    #[tokio::test]
    async fn test_mock_update_config() {
        let mut service = MockAIService::new_default();
        assert!(service.get_config().available);

        service.update_config(MockAIConfig {
            available: false,
            ..MockAIConfig::default()
        });
        assert!(!service.get_config().available);
    }
}
