//! ゲームAPIの統合テストモジュール
//! 実際のHTTPリクエストをシミュレートしてAPIの動作を確認し、
//! エンドポイント間の連携やエラーハンドリングをテストする。

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use TicTacToe::{
    ai::local_service::LocalAIService,
    api::{handlers::AppState, routes::create_router, service::GameService},
    session::GameSessionManager,
};

fn create_test_app() -> axum::Router {
    let session_manager = Arc::new(GameSessionManager::new(50));
    let service = Arc::new(GameService::new_with_ai_service(
        session_manager,
        Arc::new(LocalAIService::new_fast()),
    ));
    let state = AppState::new_with_service(service);

    create_router().with_state(state)
}

async fn parse_response_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send_request(
    app: &axum::Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    let request = if let Some(body) = body {
        request
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    } else {
        request.body(Body::empty()).unwrap()
    };

    app.clone().oneshot(request).await.unwrap()
}

#[tokio::test]
async fn test_game_full_workflow() {
    let app = create_test_app();

    let create_response = send_request(&app, Method::POST, "/api/games", None).await;
    assert_eq!(create_response.status(), StatusCode::CREATED);
    let game_data = parse_response_json(create_response).await;
    let game_id = game_data["game_id"].as_str().unwrap().to_string();

    let get_response =
        send_request(&app, Method::GET, &format!("/api/games/{}", game_id), None).await;
    assert_eq!(get_response.status(), StatusCode::OK);
    let game_state = parse_response_json(get_response).await;
    assert_eq!(game_state["current_player"], "X");
    assert_eq!(game_state["status"], "in_progress");
    assert_eq!(game_state["board"].as_array().unwrap().len(), 9);
    assert!(game_state["board"]
        .as_array()
        .unwrap()
        .iter()
        .all(|cell| cell.is_null()));
    assert_eq!(game_state["empty_squares"].as_array().unwrap().len(), 9);

    // 人間の着手とマシンの応手が1リクエストで進む
    let move_response = send_request(
        &app,
        Method::PUT,
        &format!("/api/games/{}/move", game_id),
        Some(json!({"index": 4})),
    )
    .await;
    assert_eq!(move_response.status(), StatusCode::OK);
    let move_result = parse_response_json(move_response).await;
    assert_eq!(move_result["success"], true);
    assert_eq!(move_result["player_move"], 4);
    assert!(move_result["ai_move"].is_u64());
    assert_eq!(move_result["game_state"]["move_count"], 2);
    assert_eq!(move_result["game_state"]["current_player"], "X");
    assert_eq!(move_result["game_state"]["x_count"], 1);
    assert_eq!(move_result["game_state"]["o_count"], 1);

    let history_response = send_request(
        &app,
        Method::GET,
        &format!("/api/games/{}/history", game_id),
        None,
    )
    .await;
    assert_eq!(history_response.status(), StatusCode::OK);
    let history = parse_response_json(history_response).await;
    assert_eq!(history["total_moves"], 2);
    assert_eq!(history["moves"][0]["player"], "X");
    assert_eq!(history["moves"][1]["player"], "O");

    let reset_response = send_request(
        &app,
        Method::POST,
        &format!("/api/games/{}/reset", game_id),
        None,
    )
    .await;
    assert_eq!(reset_response.status(), StatusCode::OK);
    let reset_state = parse_response_json(reset_response).await;
    assert_eq!(reset_state["status"], "in_progress");
    assert_eq!(reset_state["current_player"], "X");
    assert_eq!(reset_state["move_count"], 0);
    assert!(reset_state["board"]
        .as_array()
        .unwrap()
        .iter()
        .all(|cell| cell.is_null()));

    let delete_response =
        send_request(&app, Method::DELETE, &format!("/api/games/{}", game_id), None).await;
    assert_eq!(delete_response.status(), StatusCode::NO_CONTENT);

    let get_deleted_response =
        send_request(&app, Method::GET, &format!("/api/games/{}", game_id), None).await;
    assert_eq!(get_deleted_response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_machine_blocks_threat_over_http() {
    let app = create_test_app();

    let create_response = send_request(&app, Method::POST, "/api/games", None).await;
    let game_data = parse_response_json(create_response).await;
    let game_id = game_data["game_id"].as_str().unwrap().to_string();

    // X: 0 → マシンは中央4を取る
    let move_response = send_request(
        &app,
        Method::PUT,
        &format!("/api/games/{}/move", game_id),
        Some(json!({"index": 0})),
    )
    .await;
    let move_result = parse_response_json(move_response).await;
    assert_eq!(move_result["ai_move"], 4);

    // X: 1 で上段[0,1,2]に王手 → マシンは2を塞ぐ
    let move_response = send_request(
        &app,
        Method::PUT,
        &format!("/api/games/{}/move", game_id),
        Some(json!({"index": 1})),
    )
    .await;
    let move_result = parse_response_json(move_response).await;
    assert_eq!(move_result["ai_move"], 2);
}

#[tokio::test]
async fn test_move_on_occupied_square_rejected() {
    let app = create_test_app();

    let create_response = send_request(&app, Method::POST, "/api/games", None).await;
    let game_data = parse_response_json(create_response).await;
    let game_id = game_data["game_id"].as_str().unwrap().to_string();

    send_request(
        &app,
        Method::PUT,
        &format!("/api/games/{}/move", game_id),
        Some(json!({"index": 4})),
    )
    .await;

    // 4は既にXが置いている
    let response = send_request(
        &app,
        Method::PUT,
        &format!("/api/games/{}/move", game_id),
        Some(json!({"index": 4})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = parse_response_json(response).await;
    assert_eq!(error["error_code"], "INVALID_MOVE");
}

#[tokio::test]
async fn test_move_out_of_bounds_rejected() {
    let app = create_test_app();

    let create_response = send_request(&app, Method::POST, "/api/games", None).await;
    let game_data = parse_response_json(create_response).await;
    let game_id = game_data["game_id"].as_str().unwrap().to_string();

    let response = send_request(
        &app,
        Method::PUT,
        &format!("/api/games/{}/move", game_id),
        Some(json!({"index": 9})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = parse_response_json(response).await;
    assert_eq!(error["error_code"], "INVALID_SQUARE");
}

#[tokio::test]
async fn test_move_on_unknown_game_returns_not_found() {
    let app = create_test_app();

    let response = send_request(
        &app,
        Method::PUT,
        &format!("/api/games/{}/move", uuid::Uuid::new_v4()),
        Some(json!({"index": 0})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_terminal_game_rejects_further_moves() {
    let app = create_test_app();

    let create_response = send_request(&app, Method::POST, "/api/games", None).await;
    let game_data = parse_response_json(create_response).await;
    let game_id = game_data["game_id"].as_str().unwrap().to_string();

    // 最初の空マスに置き続けて終局まで進める（高々5手）
    let mut final_state = json!(null);
    for _ in 0..5 {
        let state_response =
            send_request(&app, Method::GET, &format!("/api/games/{}", game_id), None).await;
        let state = parse_response_json(state_response).await;
        if state["status"] != "in_progress" {
            final_state = state;
            break;
        }
        let index = state["empty_squares"][0].as_u64().unwrap();

        let move_response = send_request(
            &app,
            Method::PUT,
            &format!("/api/games/{}/move", game_id),
            Some(json!({"index": index})),
        )
        .await;
        assert_eq!(move_response.status(), StatusCode::OK);
        let move_result = parse_response_json(move_response).await;
        if move_result["game_state"]["status"] != "in_progress" {
            final_state = move_result["game_state"].clone();
            break;
        }
    }

    assert_ne!(final_state["status"], "in_progress");
    // マシンは負けないので終局はOの勝ちか引き分け
    assert_ne!(final_state["status"], "finished_x_wins");
    let move_count = final_state["move_count"].as_u64().unwrap();

    // 終局後の着手は拒否され、状態は変わらない
    let response = send_request(
        &app,
        Method::PUT,
        &format!("/api/games/{}/move", game_id),
        Some(json!({"index": 0})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = parse_response_json(response).await;
    assert_eq!(error["error_code"], "GAME_ALREADY_FINISHED");

    let state_response =
        send_request(&app, Method::GET, &format!("/api/games/{}", game_id), None).await;
    let state = parse_response_json(state_response).await;
    assert_eq!(state["move_count"].as_u64().unwrap(), move_count);

    // リセットで初期状態に戻り、再び着手できる
    let reset_response = send_request(
        &app,
        Method::POST,
        &format!("/api/games/{}/reset", game_id),
        None,
    )
    .await;
    assert_eq!(reset_response.status(), StatusCode::OK);

    let move_response = send_request(
        &app,
        Method::PUT,
        &format!("/api/games/{}/move", game_id),
        Some(json!({"index": 0})),
    )
    .await;
    assert_eq!(move_response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_session_listing() {
    let app = create_test_app();

    let sessions_response = send_request(&app, Method::GET, "/api/games", None).await;
    assert_eq!(sessions_response.status(), StatusCode::OK);
    let sessions = parse_response_json(sessions_response).await;
    assert_eq!(sessions["total_count"], 0);

    send_request(&app, Method::POST, "/api/games", None).await;
    send_request(&app, Method::POST, "/api/games", None).await;

    let sessions_response = send_request(&app, Method::GET, "/api/games", None).await;
    let sessions = parse_response_json(sessions_response).await;
    assert_eq!(sessions["total_count"], 2);
    assert_eq!(sessions["sessions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_concurrent_game_creation() {
    let app = create_test_app();

    let futures: Vec<_> = (0..10)
        .map(|_| send_request(&app, Method::POST, "/api/games", None))
        .collect();
    let responses = futures::future::join_all(futures).await;

    for response in responses {
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let sessions_response = send_request(&app, Method::GET, "/api/games", None).await;
    let sessions = parse_response_json(sessions_response).await;
    assert_eq!(sessions["total_count"], 10);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = send_request(&app, Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}
