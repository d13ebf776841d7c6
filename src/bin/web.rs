//! Single binary web server: tournament coordination over a REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.

use actix_web::{
    get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use table_tennis_tournament_web::{
    add_point, current_standings, decrement_point, end_match, end_set, group_standings,
    load_roster, parse_roster_csv, record_result, select_match, set_config, shuffle_roster,
    start_match, MatchId, Side, Team, TeamId, Tournament, TournamentConfig, TournamentError,
    TournamentId,
};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: many tournaments by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct RosterBody {
    teams: Vec<String>,
}

#[derive(Deserialize)]
struct SelectMatchBody {
    match_id: MatchId,
}

#[derive(Deserialize)]
struct PointBody {
    side: Side,
}

#[derive(Deserialize)]
struct RecordResultBody {
    match_id: MatchId,
    winner: TeamId,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and expedition group index.
#[derive(Deserialize)]
struct TournamentGroupPath {
    id: TournamentId,
    group: usize,
}

/// User-correctable conditions map to 400; invariant violations mean the
/// server's own bookkeeping broke, so they surface as 500.
fn error_response(e: TournamentError) -> HttpResponse {
    if e.is_invariant() {
        HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }))
    } else {
        HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
    }
}

/// Run an operation against one tournament under the write lock, refreshing
/// its last-activity time.
fn with_tournament<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> HttpResponse,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => {
            return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
        }
    };
    entry.last_activity = Instant::now();
    f(&mut entry.tournament)
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "table-tennis-tournament-web",
    })
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    body: Option<Json<TournamentConfig>>,
) -> HttpResponse {
    let config = body.map(|b| b.into_inner()).unwrap_or_default();
    let tournament = Tournament::new(config);
    let id = tournament.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = TournamentEntry {
        tournament,
        last_activity: Instant::now(),
    };
    let response = HttpResponse::Ok().json(&entry.tournament);
    g.insert(id, entry);
    response
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| HttpResponse::Ok().json(t))
}

/// Load the roster from a JSON list of team names (list order = seeding order).
/// Regenerates the schedule.
#[put("/api/tournaments/{id}/roster")]
async fn api_load_roster(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<RosterBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        let teams: Vec<Team> = body
            .teams
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(Team::new)
            .collect();
        load_roster(t, teams);
        HttpResponse::Ok().json(t)
    })
}

/// Load the roster from CSV text (one team name per row).
#[put("/api/tournaments/{id}/roster/csv")]
async fn api_load_roster_csv(
    state: AppState,
    path: Path<TournamentPath>,
    body: String,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| match parse_roster_csv(&body) {
        Ok(teams) => {
            load_roster(t, teams);
            HttpResponse::Ok().json(t)
        }
        Err(e) => {
            HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
    })
}

/// Shuffle the roster (randomized seeding) and regenerate the schedule.
#[post("/api/tournaments/{id}/roster/shuffle")]
async fn api_shuffle_roster(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        shuffle_roster(t);
        HttpResponse::Ok().json(t)
    })
}

/// Update format / match type / set count. Regenerates the schedule.
#[put("/api/tournaments/{id}/config")]
async fn api_set_config(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<TournamentConfig>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        set_config(t, body.into_inner());
        HttpResponse::Ok().json(t)
    })
}

/// Select a match for play.
#[put("/api/tournaments/{id}/matches/select")]
async fn api_select_match(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<SelectMatchBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| match select_match(t, body.match_id) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    })
}

/// Start scoring the selected match.
#[post("/api/tournaments/{id}/matches/start")]
async fn api_start_match(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| match start_match(t) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    })
}

/// Add a point to one side of the match in progress.
#[post("/api/tournaments/{id}/score/point")]
async fn api_add_point(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<PointBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| match add_point(t, body.side) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    })
}

/// Remove a point from one side (correction, clamped at zero).
#[post("/api/tournaments/{id}/score/point/remove")]
async fn api_decrement_point(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<PointBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| match decrement_point(t, body.side) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    })
}

/// End the current set; returns the notifications the UI should surface.
#[post("/api/tournaments/{id}/score/end-set")]
async fn api_end_set(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| match end_set(t) {
        Ok(notifications) => HttpResponse::Ok()
            .json(serde_json::json!({ "notifications": notifications, "tournament": t })),
        Err(e) => error_response(e),
    })
}

/// End the match (completes it if decided, otherwise abandons it).
#[post("/api/tournaments/{id}/score/end-match")]
async fn api_end_match(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| match end_match(t) {
        Ok(notifications) => HttpResponse::Ok()
            .json(serde_json::json!({ "notifications": notifications, "tournament": t })),
        Err(e) => error_response(e),
    })
}

/// Record a match result directly (paper score entry).
#[post("/api/tournaments/{id}/matches/result")]
async fn api_record_result(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        match record_result(t, body.match_id, body.winner) {
            Ok(notifications) => HttpResponse::Ok()
                .json(serde_json::json!({ "notifications": notifications, "tournament": t })),
            Err(e) => error_response(e),
        }
    })
}

/// Round-robin standings (empty list for other formats).
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        HttpResponse::Ok().json(current_standings(t))
    })
}

/// Standings of one expedition group.
#[get("/api/tournaments/{id}/groups/{group}/standings")]
async fn api_group_standings(state: AppState, path: Path<TournamentGroupPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        HttpResponse::Ok().json(group_standings(t, path.group))
    })
}

/// Completed match history, oldest first.
#[get("/api/tournaments/{id}/history")]
async fn api_history(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| HttpResponse::Ok().json(&t.history))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));

    // Background task: every 30 minutes, remove tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!(
                    "Cleaned up {} inactive tournament(s) (no activity for 12h)",
                    removed
                );
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_load_roster)
            .service(api_load_roster_csv)
            .service(api_shuffle_roster)
            .service(api_set_config)
            .service(api_select_match)
            .service(api_start_match)
            .service(api_add_point)
            .service(api_decrement_point)
            .service(api_end_set)
            .service(api_end_match)
            .service(api_record_result)
            .service(api_standings)
            .service(api_group_standings)
            .service(api_history)
    })
    .bind(bind)?
    .run()
    .await
}
