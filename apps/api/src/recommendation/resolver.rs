//! Recommendation Resolver: turns a user's interests and the property catalog
//! into a short, catalog-backed list of recommended properties.
//!
//! Flow: load user → load catalog → build prompt → completion call →
//!       sanitize → parse ids → dedupe + sort + cap → look up each id.
//!
//! The result is ordered by ascending property id, never by the model's order.
//! Ids the model invents, or that were deleted mid-request, are dropped without
//! error. Any failure of the completion call or of parsing its output fails the
//! whole request; nothing is retried here.

use std::collections::BTreeSet;

use serde_json::value::RawValue;
use tracing::{debug, info, warn};

use crate::catalog::CatalogStore;
use crate::errors::AppError;
use crate::llm_client::sanitize::{sanitize, OutputFormat};
use crate::llm_client::CompletionClient;
use crate::models::property::Property;
use crate::recommendation::prompts::{
    build_prompt, Candidate, MAX_RECOMMENDATIONS, RECOMMENDATION_TEMPERATURE,
};

/// Runs the recommendation pipeline for `user_id`.
///
/// Fails with `NotFound` before any completion call if the user does not exist.
pub async fn recommend_properties(
    store: &dyn CatalogStore,
    llm: &dyn CompletionClient,
    user_id: i64,
) -> Result<Vec<Property>, AppError> {
    let user = store
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let catalog = store.list_properties().await?;
    info!(
        "Recommending for user {}: {} interests, {} candidate properties",
        user.id,
        user.interests.len(),
        catalog.len()
    );

    // Nothing the model says could resolve against an empty catalog.
    if catalog.is_empty() {
        info!("Property catalog is empty; skipping completion call");
        return Ok(Vec::new());
    }

    let candidates: Vec<Candidate<'_>> = catalog.iter().map(Candidate::from).collect();
    let prompt = build_prompt(&user.interests, &candidates);

    let raw = llm
        .complete(&prompt, RECOMMENDATION_TEMPERATURE)
        .await
        .map_err(|e| AppError::Llm(format!("Recommendation completion failed: {e}")))?;
    debug!("Completion returned: {raw}");

    let cleaned = sanitize(&raw, OutputFormat::Json);
    let ids = parse_property_ids(&cleaned)?;
    let selected = select_ids(ids);
    info!("Model recommended property ids {:?}", selected);

    resolve_properties(store, &selected).await
}

/// Parses sanitized model output as a JSON array of integers.
///
/// Integers outside the `i64` range cannot name a property and are dropped
/// like any other unknown id. Anything that is not an integer is a format error.
pub fn parse_property_ids(text: &str) -> Result<Vec<i64>, AppError> {
    let values: Vec<&RawValue> = serde_json::from_str(text).map_err(|e| {
        warn!("Completion output is not a JSON array: {e}");
        AppError::UpstreamFormat(format!("expected a JSON array of integers: {e}"))
    })?;

    let mut ids = Vec::with_capacity(values.len());
    for value in values {
        let token = value.get();
        if !is_integer_token(token) {
            warn!("Completion output holds a non-integer element: {token}");
            return Err(AppError::UpstreamFormat(format!(
                "expected a JSON array of integers, found {token}"
            )));
        }
        match token.parse::<i64>() {
            Ok(id) => ids.push(id),
            Err(_) => debug!("Dropping out-of-range property id {token}"),
        }
    }
    Ok(ids)
}

/// A JSON integer literal: optional minus sign, then digits only.
fn is_integer_token(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Deduplicates, sorts ascending and keeps the lowest `MAX_RECOMMENDATIONS` ids.
///
/// The cap applies after deduplication, so repeated ids never crowd out
/// distinct ones.
pub fn select_ids(ids: impl IntoIterator<Item = i64>) -> Vec<i64> {
    ids.into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

/// Looks up each id in order, silently skipping ids with no property.
async fn resolve_properties(
    store: &dyn CatalogStore,
    ids: &[i64],
) -> Result<Vec<Property>, AppError> {
    let mut properties = Vec::with_capacity(ids.len());
    for &id in ids {
        match store.get_property(id).await? {
            Some(property) => properties.push(property),
            None => debug!("Dropping recommended property {id}: not in catalog"),
        }
    }
    Ok(properties)
}
