use futures_util::{Stream, StreamExt};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;
use warp::Filter;
use warp::http::StatusCode;
use warp::hyper::body::{Buf, Bytes};
use warp::reply::{Json, WithStatus};

use guess_core::{
    AdminGate, CorrectionService, GameClock, GuessSubmissionService, LedgerError, LedgerResult,
    MergeService, PlayerService, PlayerStore,
};
use guess_types::{
    ChangeNameRequest, DeleteGuessRequest, EditDateRequest, ErrorKind, ErrorResponse,
    MarkCheatRequest, MergeRequest, NameChange, SubmitGuessRequest,
};

pub mod admin;
pub mod config;

const MAX_BODY_BYTES: usize = 16 * 1024;

/// Everything the routes need, wired to one store
#[derive(Clone)]
pub struct Services {
    pub players: Arc<PlayerService>,
    pub submissions: Arc<GuessSubmissionService>,
    pub corrections: Arc<CorrectionService>,
    pub merges: Arc<MergeService>,
    pub admin_gate: Arc<AdminGate>,
}

impl Services {
    pub fn new(store: Arc<dyn PlayerStore>, clock: Arc<dyn GameClock>, admin_gate: AdminGate) -> Self {
        Self {
            players: Arc::new(PlayerService::new(store.clone())),
            submissions: Arc::new(GuessSubmissionService::new(store.clone(), clock)),
            corrections: Arc::new(CorrectionService::new(store.clone())),
            merges: Arc::new(MergeService::new(store)),
            admin_gate: Arc::new(admin_gate),
        }
    }
}

pub fn create_routes(
    services: Services,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // Clone for filters
    let players_filter = warp::any().map({
        let players = services.players.clone();
        move || players.clone()
    });

    let submissions_filter = warp::any().map({
        let submissions = services.submissions.clone();
        move || submissions.clone()
    });

    let corrections_filter = warp::any().map({
        let corrections = services.corrections.clone();
        move || corrections.clone()
    });

    let merges_filter = warp::any().map({
        let merges = services.merges.clone();
        move || merges.clone()
    });

    let gate_filter = warp::any().map({
        let admin_gate = services.admin_gate.clone();
        move || admin_gate.clone()
    });

    // Chunked bodies carry no Content-Length, so the size is checked while reading
    let json_body = warp::body::stream().then(collect_body);

    // Health check endpoint
    let health = warp::path!("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let create_player = warp::path!("player")
        .and(warp::post())
        .and(players_filter.clone())
        .and_then(handle_create_player);

    // Must stay ahead of the identity route, which has the same shape
    let room_snapshot = warp::path!("player" / "room" / String)
        .and(warp::get())
        .and(players_filter.clone())
        .and_then(handle_room_snapshot);

    let identity = warp::path!("player" / String / String)
        .and(warp::get())
        .and(players_filter.clone())
        .and_then(handle_identity);

    let profile = warp::path!("player" / String)
        .and(warp::get())
        .and(players_filter.clone())
        .and_then(handle_profile);

    let change_name = warp::path!("player" / "name")
        .and(warp::put())
        .and(json_body.clone())
        .and(players_filter)
        .and_then(handle_change_name);

    let submit_guess = warp::path!("player" / "guess")
        .and(warp::put())
        .and(json_body.clone())
        .and(submissions_filter)
        .and_then(handle_submit_guess);

    // Admin corrections
    let delete_guess = warp::path!("player" / "guess")
        .and(warp::delete())
        .and(json_body.clone())
        .and(gate_filter.clone())
        .and(corrections_filter.clone())
        .and_then(handle_delete_guess);

    let mark_cheat = warp::path!("player" / "cheat")
        .and(warp::put())
        .and(json_body.clone())
        .and(gate_filter.clone())
        .and(corrections_filter.clone())
        .and_then(handle_mark_cheat);

    let edit_date = warp::path!("player" / "guess" / "date")
        .and(warp::put())
        .and(json_body.clone())
        .and(gate_filter)
        .and(corrections_filter)
        .and_then(handle_edit_date);

    let merge = warp::path!("player" / "merge")
        .and(warp::put())
        .and(json_body)
        .and(merges_filter)
        .and_then(handle_merge);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"]);

    health
        .or(create_player)
        .or(room_snapshot)
        .or(identity)
        .or(profile)
        .or(change_name)
        .or(submit_guess)
        .or(delete_guess)
        .or(mark_cheat)
        .or(edit_date)
        .or(merge)
        .with(cors)
        .with(warp::log("guess_ledger"))
}

async fn collect_body(
    stream: impl Stream<Item = Result<impl Buf, warp::Error>>,
) -> LedgerResult<Bytes> {
    futures_util::pin_mut!(stream);

    let mut body = Vec::new();
    while let Some(chunk) = stream.next().await {
        let mut chunk = chunk.map_err(|err| {
            tracing::warn!("Failed to read request body: {}", err);
            LedgerError::validation("Invalid arguments")
        })?;
        if body.len() + chunk.remaining() > MAX_BODY_BYTES {
            return Err(LedgerError::validation("Request body too large"));
        }
        while chunk.has_remaining() {
            let part = chunk.chunk();
            let read = part.len();
            body.extend_from_slice(part);
            chunk.advance(read);
        }
    }
    Ok(Bytes::from(body))
}

fn parse_json(body: LedgerResult<Bytes>) -> LedgerResult<Value> {
    serde_json::from_slice(&body?).map_err(|err| {
        tracing::warn!("Rejected malformed JSON body: {}", err);
        LedgerError::validation("Invalid arguments")
    })
}

fn decode<T: DeserializeOwned>(body: Value) -> LedgerResult<T> {
    serde_json::from_value(body).map_err(|err| {
        tracing::warn!("Rejected request body: {}", err);
        LedgerError::validation("Invalid arguments")
    })
}

/// Path parameters arrive percent-encoded
fn decode_segment(raw: &str) -> LedgerResult<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|segment| segment.into_owned())
        .map_err(|_| LedgerError::validation("Invalid path parameter encoding"))
}

fn parse_public_id(raw: &str) -> LedgerResult<Uuid> {
    Uuid::parse_str(&decode_segment(raw)?)
        .map_err(|_| LedgerError::validation("Invalid public id format"))
}

fn error_reply(err: &LedgerError) -> WithStatus<Json> {
    let status = match err.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::DuplicateSubmission => StatusCode::CONFLICT,
        ErrorKind::AdminDenied => StatusCode::UNAUTHORIZED,
        ErrorKind::Store => StatusCode::INTERNAL_SERVER_ERROR,
    };

    // Backend details stay in the logs
    let message = match err {
        LedgerError::Store(source) => {
            tracing::error!("Request failed in the store: {}", source);
            "Storage unavailable".to_string()
        }
        other => other.to_string(),
    };

    warp::reply::with_status(
        warp::reply::json(&ErrorResponse {
            kind: err.kind(),
            error: message,
        }),
        status,
    )
}

fn respond<T: Serialize>(result: LedgerResult<T>, status: StatusCode) -> WithStatus<Json> {
    match result {
        Ok(value) => warp::reply::with_status(warp::reply::json(&value), status),
        Err(err) => error_reply(&err),
    }
}

async fn handle_create_player(
    players: Arc<PlayerService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(respond(players.register().await, StatusCode::CREATED))
}

async fn handle_room_snapshot(
    room_id: String,
    players: Arc<PlayerService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = async move {
        let room_id = decode_segment(&room_id)?;
        players.room_snapshot(&room_id).await
    }
    .await;
    Ok(respond(result, StatusCode::OK))
}

async fn handle_identity(
    public_id: String,
    private_id: String,
    players: Arc<PlayerService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = async move {
        let public_id = parse_public_id(&public_id)?;
        let private_id = decode_segment(&private_id)?;
        players.identify(public_id, &private_id).await
    }
    .await;
    Ok(respond(result, StatusCode::OK))
}

async fn handle_profile(
    public_id: String,
    players: Arc<PlayerService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = async move {
        let public_id = parse_public_id(&public_id)?;
        players.profile(public_id).await
    }
    .await;
    Ok(respond(result, StatusCode::OK))
}

async fn handle_change_name(
    body: LedgerResult<Bytes>,
    players: Arc<PlayerService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = async move {
        let request: ChangeNameRequest = decode(parse_json(body)?)?;
        let change = players
            .change_name(&request.private_id, &request.name)
            .await?;
        Ok(match change {
            NameChange::Unchanged => "No change needed",
            NameChange::Changed => "Player name changed",
        })
    }
    .await;
    Ok(respond(result, StatusCode::OK))
}

async fn handle_submit_guess(
    body: LedgerResult<Bytes>,
    submissions: Arc<GuessSubmissionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = async move {
        let request: SubmitGuessRequest = decode(parse_json(body)?)?;
        submissions.submit(request).await
    }
    .await;
    Ok(respond(result, StatusCode::OK))
}

async fn handle_delete_guess(
    body: LedgerResult<Bytes>,
    admin_gate: Arc<AdminGate>,
    corrections: Arc<CorrectionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = async move {
        let body = parse_json(body)?;
        let admin = admin::authorize(&admin_gate, &body)?;
        let request: DeleteGuessRequest = decode(body)?;
        corrections
            .delete_guess(
                &admin,
                request.player_public_id,
                &request.room_id,
                request.guess_id,
            )
            .await
    }
    .await;
    Ok(respond(result, StatusCode::OK))
}

async fn handle_mark_cheat(
    body: LedgerResult<Bytes>,
    admin_gate: Arc<AdminGate>,
    corrections: Arc<CorrectionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = async move {
        let body = parse_json(body)?;
        let admin = admin::authorize(&admin_gate, &body)?;
        let request: MarkCheatRequest = decode(body)?;
        corrections
            .mark_cheat(
                &admin,
                request.cheater_public_id,
                &request.room_id,
                &request.game_date,
            )
            .await
    }
    .await;
    Ok(respond(result, StatusCode::OK))
}

async fn handle_edit_date(
    body: LedgerResult<Bytes>,
    admin_gate: Arc<AdminGate>,
    corrections: Arc<CorrectionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = async move {
        let body = parse_json(body)?;
        let admin = admin::authorize(&admin_gate, &body)?;
        let request: EditDateRequest = decode(body)?;
        corrections
            .edit_date(
                &admin,
                request.player_public_id,
                &request.room_id,
                request.guess_id,
                &request.new_date,
            )
            .await
    }
    .await;
    Ok(respond(result, StatusCode::OK))
}

async fn handle_merge(
    body: LedgerResult<Bytes>,
    merges: Arc<MergeService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = async move {
        let request: MergeRequest = decode(parse_json(body)?)?;
        merges
            .merge(&request.private_id_to_merge, &request.private_id_to_be_merged)
            .await
    }
    .await;
    Ok(respond(result, StatusCode::OK))
}
