use std::net::{IpAddr, Ipv4Addr};

use minesweeper_common::{
    models::{ActionRequest, CreateResponse, GameParams, GameSnapshot},
    protocol::{ClientMessage, ErrorCode, ServerMessage},
};
use minesweeper_engine::{
    CreateGameUseCase, FlagUseCase, Game, GameError, GameId, GameInfoUseCase,
    InMemoryGameRepository, LevelConfig, OpenUseCase, RandomMines, UseCaseError,
};
use rocket::{
    State,
    futures::{SinkExt, StreamExt},
    get,
    http::Status,
    post,
    serde::json::Json,
};
use rocket_ws::{Channel, Message, WebSocket, stream::DuplexStream};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    config::ServerConfig,
    rate_limit::{RateLimiter, check_rate_limit},
};

pub type Games = InMemoryGameRepository;

fn status_for(err: &UseCaseError) -> Status {
    match err {
        UseCaseError::NotFound { .. } => Status::NotFound,
        UseCaseError::Conflict { .. } => Status::Conflict,
        UseCaseError::Game(_) => Status::BadRequest,
    }
}

fn error_code(err: &UseCaseError) -> ErrorCode {
    match err {
        UseCaseError::NotFound { .. } => ErrorCode::NotFound,
        UseCaseError::Conflict { .. } => ErrorCode::Conflict,
        UseCaseError::Game(GameError::OutOfBounds { .. }) => ErrorCode::OutOfBounds,
        UseCaseError::Game(_) => ErrorCode::InvalidLevel,
    }
}

fn create(games: &Games, level: LevelConfig, config: &ServerConfig) -> Result<Game, UseCaseError> {
    CreateGameUseCase::new(games.clone(), RandomMines::new())
        .with_max_attempts(config.save_attempts)
        .execute(level)
}

fn game_info(games: &Games, id: &str) -> Result<GameSnapshot, UseCaseError> {
    let game = GameInfoUseCase::new(games.clone()).execute(&GameId::new(id))?;
    Ok(game.snapshot())
}

fn open(games: &Games, request: &ActionRequest, config: &ServerConfig) -> Result<GameSnapshot, UseCaseError> {
    let applied = OpenUseCase::new(games.clone())
        .with_max_attempts(config.save_attempts)
        .execute(request)?;
    Ok(applied.game.snapshot())
}

fn flag(games: &Games, request: &ActionRequest, config: &ServerConfig) -> Result<GameSnapshot, UseCaseError> {
    let applied = FlagUseCase::new(games.clone())
        .with_max_attempts(config.save_attempts)
        .execute(request)?;
    Ok(applied.game.snapshot())
}

fn respond(result: Result<GameSnapshot, UseCaseError>) -> Result<Json<GameSnapshot>, Status> {
    result.map(Json).map_err(|err| {
        warn!("Request failed: {}", err);
        status_for(&err)
    })
}

fn client_key(client_ip: Option<IpAddr>) -> IpAddr {
    client_ip.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

#[post("/create", data = "<params>")]
#[instrument(level = "trace", skip(games, rate_limiter, config), fields(width = params.width, height = params.height, mines = params.mines))]
pub fn create_game(
    params: Json<GameParams>,
    games: &State<Games>,
    rate_limiter: &State<RateLimiter>,
    config: &State<ServerConfig>,
    client_ip: Option<IpAddr>,
) -> Result<Json<CreateResponse>, Status> {
    let client = client_key(client_ip);
    info!(
        "Game creation request from {}: {}x{} with {} mines",
        client, params.width, params.height, params.mines
    );

    check_rate_limit(rate_limiter, client, config.games_per_minute)?;

    let level = LevelConfig::with_max_cells(
        params.width,
        params.height,
        params.mines,
        config.max_board_cells,
    )
    .map_err(|err| {
        warn!("Rejecting game parameters from {}: {}", client, err);
        Status::BadRequest
    })?;
    let game = create(games, level, config).map_err(|err| {
        warn!("Request failed: {}", err);
        status_for(&err)
    })?;

    info!("Successfully created game {} for client {}", game.id(), client);
    Ok(Json(CreateResponse {
        id: game.id().to_string(),
    }))
}

#[get("/games/<id>")]
#[instrument(level = "trace", skip(games))]
pub fn get_game(id: &str, games: &State<Games>) -> Result<Json<GameSnapshot>, Status> {
    respond(game_info(games, id))
}

#[post("/open", data = "<request>")]
#[instrument(level = "trace", skip(games, config), fields(game_id = %request.game_id, x = request.x, y = request.y))]
pub fn open_cell(
    request: Json<ActionRequest>,
    games: &State<Games>,
    config: &State<ServerConfig>,
) -> Result<Json<GameSnapshot>, Status> {
    respond(open(games, &request, config))
}

#[post("/flag", data = "<request>")]
#[instrument(level = "trace", skip(games, config), fields(game_id = %request.game_id, x = request.x, y = request.y))]
pub fn flag_cell(
    request: Json<ActionRequest>,
    games: &State<Games>,
    config: &State<ServerConfig>,
) -> Result<Json<GameSnapshot>, Status> {
    respond(flag(games, &request, config))
}

/// Answers one WebSocket frame. Every game-related reply carries the full
/// snapshot of the game that was touched.
pub fn handle_message(
    games: &Games,
    config: &ServerConfig,
    rate_limiter: &RateLimiter,
    client: IpAddr,
    message: ClientMessage,
) -> ServerMessage {
    let result = match message {
        ClientMessage::Ping => return ServerMessage::Pong,
        ClientMessage::GameInfo { game_id: Some(id) } => game_info(games, &id),
        ClientMessage::GameInfo { game_id: None } => {
            if check_rate_limit(rate_limiter, client, config.games_per_minute).is_err() {
                return ServerMessage::Error {
                    code: ErrorCode::RateLimited,
                    message: "too many new games, try again later".to_string(),
                };
            }
            create(games, LevelConfig::default(), config).map(|game| game.snapshot())
        }
        ClientMessage::Open(request) => open(games, &request, config),
        ClientMessage::Flag(request) => flag(games, &request, config),
    };

    match result {
        Ok(snapshot) => ServerMessage::GameInfo(snapshot),
        Err(err) => {
            warn!("WebSocket request failed: {}", err);
            ServerMessage::Error {
                code: error_code(&err),
                message: err.to_string(),
            }
        }
    }
}

async fn send(stream: &mut DuplexStream, message: &ServerMessage) -> bool {
    match serde_json::to_string(message) {
        Ok(text) => stream.send(Message::Text(text)).await.is_ok(),
        Err(e) => {
            error!("Failed to serialize server message: {}", e);
            true
        }
    }
}

#[get("/ws")]
#[instrument(level = "trace", skip(ws, games, rate_limiter, config))]
pub fn websocket_handler(
    ws: WebSocket,
    games: &State<Games>,
    rate_limiter: &State<RateLimiter>,
    config: &State<ServerConfig>,
    client_ip: Option<IpAddr>,
) -> Channel<'static> {
    let games = games.inner().clone();
    let rate_limiter = rate_limiter.inner().clone();
    let config = config.inner().clone();
    let client = client_key(client_ip);
    let connection = Uuid::new_v4();

    ws.channel(move |mut stream| {
        Box::pin(async move {
            info!("Client {} connected (connection: {})", client, connection);

            while let Some(message) = stream.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        let reply = match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(message) => {
                                debug!("Received message on {}: {:?}", connection, message);
                                handle_message(&games, &config, &rate_limiter, client, message)
                            }
                            Err(e) => {
                                warn!(
                                    "Invalid message format on {}: {} - Error: {}",
                                    connection, text, e
                                );
                                ServerMessage::Error {
                                    code: ErrorCode::BadRequest,
                                    message: e.to_string(),
                                }
                            }
                        };

                        if !send(&mut stream, &reply).await {
                            warn!("Failed to reply on connection {}", connection);
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        info!("WebSocket connection {} closed", connection);
                        break;
                    }
                    Ok(_) => {
                        debug!("Ignoring non-text frame on connection {}", connection);
                    }
                    Err(e) => {
                        error!("WebSocket error on connection {}: {}", connection, e);
                        break;
                    }
                }
            }

            info!("Client {} disconnected (connection: {})", client, connection);
            Ok(())
        })
    })
}
