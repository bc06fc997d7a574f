use axum::extract::{Extension, State};

use crate::db::{AppState, Collection, Document, Filter, collection, queries};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path, Query};
use crate::jwt::AuthContext;
use crate::models::{
    CreatePaymentIntent, DeleteResult, EmailQuery, PaymentIntentCreated, PaymentRecorded,
};
use crate::payments::DEFAULT_CURRENCY;
use crate::util::price_to_minor_units;

/// POST /create-payment-intent - `price` is in dollars; the provider gets cents.
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentIntent>,
) -> Result<Json<PaymentIntentCreated>> {
    let amount = price_to_minor_units(request.price)
        .ok_or_else(|| AppError::BadRequest("price must be a non-negative number".into()))?;

    let intent = state
        .payments
        .create_intent(amount, DEFAULT_CURRENCY)
        .await?;

    Ok(Json(PaymentIntentCreated {
        client_secret: intent.client_secret,
    }))
}

/// POST /payments-info - store the payment and clear the cart items it paid for.
pub async fn record_payment(
    State(state): State<AppState>,
    Json(payment): Json<Document>,
) -> Result<Json<PaymentRecorded>> {
    let mut conn = state.db.get()?;
    let (insert_res, delete_res) = queries::record_payment(&mut conn, payment)?;

    tracing::info!(
        payment_id = ?insert_res.inserted_id,
        carts_cleared = delete_res.deleted_count,
        "Payment recorded"
    );

    Ok(Json(PaymentRecorded {
        insert_res,
        delete_res,
    }))
}

/// GET /payments?email= - callers may only list their own payments.
pub async fn list_payments(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Document>>> {
    if query.email.as_deref() != Some(ctx.email.as_str()) {
        tracing::debug!(caller = %ctx.email, requested = ?query.email, "Payment listing for another user");
        return Err(AppError::Forbidden);
    }

    let conn = state.db.get()?;
    let payments = collection::find_many(
        &conn,
        Collection::Payments,
        &Filter::new().eq("email", ctx.email),
    )?;
    Ok(Json(payments))
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>> {
    let conn = state.db.get()?;
    let result = collection::delete_one(&conn, Collection::Payments, &Filter::by_id(&id))?;
    Ok(Json(result))
}
