use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use service_core::error::AppError;

use crate::{
    dtos::agent::{AgentRequest, BartenderRequest, ImageQuery, ImageResponse, ModelName},
    models::CocktailRecommendation,
    services::{
        agents::{Agent, AgentKind},
        image_generator,
        providers::StreamChunk,
    },
    utils::ValidatedJson,
    AppState,
};

/// List all available agent ids.
pub async fn list_agents() -> impl IntoResponse {
    let ids: Vec<&'static str> = AgentKind::all().iter().map(|a| a.id()).collect();
    Json(ids)
}

/// Stream a casual-chat reply as `text/event-stream`. Dropping the response
/// body (client disconnect) drops the provider stream and stops upstream
/// consumption.
pub async fn casual_chat(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AgentRequest>,
) -> Result<Response, AppError> {
    let model = resolve_model(&state, req.model);
    let agent = Agent::new(AgentKind::CasualChat, state.chat_provider.clone(), model, req.user_id);

    let stream = agent.run_stream(&req.message).await?;
    let body_stream = stream.filter_map(|chunk| async move {
        match chunk {
            Ok(StreamChunk::Text(text)) => Some(Ok(Bytes::from(text))),
            Ok(StreamChunk::Done) => None,
            Err(e) => Some(Err(e)),
        }
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?;
    Ok(response)
}

/// Run the classic bartender and return the structured recommendation.
pub async fn classic_bartender(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<BartenderRequest>,
) -> Result<impl IntoResponse, AppError> {
    run_bartender(state, AgentKind::ClassicBartender, req).await
}

/// Run the creative bartender and return the structured recommendation.
pub async fn creative_bartender(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<BartenderRequest>,
) -> Result<impl IntoResponse, AppError> {
    run_bartender(state, AgentKind::CreativeBartender, req).await
}

async fn run_bartender(
    state: AppState,
    kind: AgentKind,
    req: BartenderRequest,
) -> Result<impl IntoResponse, AppError> {
    let model = resolve_model(&state, req.model);
    let agent = Agent::new(kind, state.chat_provider.clone(), model, req.user_id);

    let response = agent.run_bartender(&req.user_prompt()).await?;

    // Image generation happens after the response is composed and never
    // blocks it; clients poll /agents/cocktail_image.
    if let (Some(cocktail), Some(user_id), Some(session_id)) =
        (response.cocktail.clone(), req.user_id, req.session_id.clone())
    {
        spawn_image_generation(&state, cocktail, user_id, session_id);
    }

    Ok(Json(response))
}

/// Fetch the generated cocktail image URL for a session.
pub async fn cocktail_image(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let image_url = state
        .image_cache
        .get_image_url(query.user_id, &query.session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Image not found or not ready yet")))?;
    Ok(Json(ImageResponse { image_url }))
}

/// Manually trigger image generation from the built-in sample
/// recommendation. Returns immediately; generation runs in the background.
pub async fn make_image(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> impl IntoResponse {
    spawn_image_generation(
        &state,
        CocktailRecommendation::sample(),
        query.user_id,
        query.session_id,
    );
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "generating"
        })),
    )
}

fn resolve_model(state: &AppState, requested: Option<ModelName>) -> String {
    match requested {
        Some(model) => model.as_str().to_string(),
        None => state.config.llm.chat_model.clone(),
    }
}

fn spawn_image_generation(
    state: &AppState,
    cocktail: CocktailRecommendation,
    user_id: i64,
    session_id: String,
) {
    tokio::spawn(image_generator::generate_and_store_image(
        state.image_generator.clone(),
        state.image_cache.clone(),
        cocktail,
        user_id,
        session_id,
    ));
}
