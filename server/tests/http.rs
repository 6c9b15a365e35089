use std::net::{IpAddr, Ipv4Addr};

use minesweeper_common::{
    models::{ActionRequest, CellState, CreateResponse, GameParams, GameResult, GameSnapshot},
    protocol::{ClientMessage, ErrorCode, ServerMessage},
};
use minesweeper_server::{
    build_rocket,
    config::ServerConfig,
    rate_limit::create_rate_limiter,
    routes::{Games, handle_message},
};
use rocket::{http::Status, local::blocking::Client};
use serde_json::Value;

fn client(config: ServerConfig) -> Client {
    Client::tracked(build_rocket(config).expect("valid cors")).expect("valid rocket")
}

fn create(client: &Client, params: GameParams) -> String {
    let response = client.post("/create").json(&params).dispatch();
    assert_eq!(response.status(), Status::Ok);
    response.into_json::<CreateResponse>().expect("create body").id
}

#[test]
fn created_game_is_served_with_hidden_cells() {
    let client = client(ServerConfig::default());
    let id = create(&client, GameParams::default());

    let response = client.get(format!("/games/{id}")).dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().expect("snapshot body");

    assert_eq!(body["game_id"], Value::String(id));
    assert_eq!(body["level_config"]["mine_count"], 10);
    assert_eq!(body["game_state"]["is_playing"], true);
    assert_eq!(body["game_state"]["remaining_mine_estimate"], 10);

    let rows = body["board"]["cells"].as_array().expect("rows");
    assert_eq!(rows.len(), 9);
    for cell in rows.iter().flat_map(|row| row.as_array().expect("row")) {
        assert_eq!(cell["state"], "hidden");
        assert!(cell.get("number").is_none());
        assert!(cell.get("mine").is_none());
    }
}

#[test]
fn open_and_flag_return_snapshots() {
    let client = client(ServerConfig::default());
    let id = create(&client, GameParams::default());

    let flagged: GameSnapshot = client
        .post("/flag")
        .json(&ActionRequest::new(id.as_str(), 0, 0))
        .dispatch()
        .into_json()
        .expect("flag body");
    assert_eq!(flagged.board.cells[0][0].state, CellState::Marked);
    assert_eq!(flagged.game_state.remaining_mine_estimate, 9);

    let opened = client
        .post("/open")
        .json(&ActionRequest::new(id.as_str(), 4, 4))
        .dispatch();
    assert_eq!(opened.status(), Status::Ok);
    let opened: GameSnapshot = opened.into_json().expect("open body");
    let center = &opened.board.cells[4][4];
    assert_eq!(center.state, CellState::Revealed);
    if opened.game_state.result != GameResult::Lost {
        assert!(center.number.is_some());
    }
}

#[test]
fn out_of_bounds_is_bad_request() {
    let client = client(ServerConfig::default());
    let id = create(&client, GameParams::default());

    let response = client
        .post("/open")
        .json(&ActionRequest::new(id, 9, 0))
        .dispatch();
    assert_eq!(response.status(), Status::BadRequest);
}

#[test]
fn unknown_game_is_not_found() {
    let client = client(ServerConfig::default());

    assert_eq!(
        client.get("/games/missing").dispatch().status(),
        Status::NotFound
    );
    assert_eq!(
        client
            .post("/flag")
            .json(&ActionRequest::new("missing", 0, 0))
            .dispatch()
            .status(),
        Status::NotFound
    );
}

#[test]
fn invalid_level_is_rejected() {
    let client = client(ServerConfig::default());
    let params = GameParams {
        width: 3,
        height: 3,
        mines: 9,
    };

    let response = client.post("/create").json(&params).dispatch();
    assert_eq!(response.status(), Status::BadRequest);
}

#[test]
fn oversized_board_is_rejected() {
    let client = client(ServerConfig {
        max_board_cells: 400,
        ..ServerConfig::default()
    });
    let oversized = GameParams {
        width: 4000,
        height: 4000,
        mines: 1,
    };
    let just_over = GameParams {
        width: 21,
        height: 20,
        mines: 10,
    };

    for params in [oversized, just_over] {
        let response = client.post("/create").json(&params).dispatch();
        assert_eq!(response.status(), Status::BadRequest);
    }
    create(
        &client,
        GameParams {
            width: 20,
            height: 20,
            mines: 10,
        },
    );
}

#[test]
fn game_creation_is_rate_limited() {
    let client = client(ServerConfig {
        games_per_minute: 1,
        ..ServerConfig::default()
    });

    create(&client, GameParams::default());
    let response = client
        .post("/create")
        .json(&GameParams::default())
        .dispatch();
    assert_eq!(response.status(), Status::TooManyRequests);
}

fn local() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

#[test]
fn ping_gets_pong() {
    let reply = handle_message(
        &Games::new(),
        &ServerConfig::default(),
        &create_rate_limiter(),
        local(),
        ClientMessage::Ping,
    );
    assert_eq!(reply, ServerMessage::Pong);
}

#[test]
fn game_info_without_id_starts_a_default_game() {
    let games = Games::new();
    let reply = handle_message(
        &games,
        &ServerConfig::default(),
        &create_rate_limiter(),
        local(),
        ClientMessage::GameInfo { game_id: None },
    );

    let ServerMessage::GameInfo(snapshot) = reply else {
        panic!("expected a snapshot, got {reply:?}");
    };
    assert_eq!(snapshot.level_config.width, 9);
    assert_eq!(snapshot.level_config.mine_count, 10);
    assert_eq!(games.len(), 1);
}

#[test]
fn websocket_errors_carry_codes() {
    let games = Games::new();
    let config = ServerConfig {
        games_per_minute: 1,
        ..ServerConfig::default()
    };
    let limiter = create_rate_limiter();

    let missing = handle_message(
        &games,
        &config,
        &limiter,
        local(),
        ClientMessage::Open(ActionRequest::new("missing", 0, 0)),
    );
    assert!(matches!(
        missing,
        ServerMessage::Error {
            code: ErrorCode::NotFound,
            ..
        }
    ));

    let ServerMessage::GameInfo(snapshot) = handle_message(
        &games,
        &config,
        &limiter,
        local(),
        ClientMessage::GameInfo { game_id: None },
    ) else {
        panic!("expected a snapshot");
    };

    let outside = handle_message(
        &games,
        &config,
        &limiter,
        local(),
        ClientMessage::Flag(ActionRequest::new(snapshot.game_id, 0, 42)),
    );
    assert!(matches!(
        outside,
        ServerMessage::Error {
            code: ErrorCode::OutOfBounds,
            ..
        }
    ));

    let limited = handle_message(
        &games,
        &config,
        &limiter,
        local(),
        ClientMessage::GameInfo { game_id: None },
    );
    assert!(matches!(
        limited,
        ServerMessage::Error {
            code: ErrorCode::RateLimited,
            ..
        }
    ));
}
