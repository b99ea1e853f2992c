//! Wire-format DTOs for the engine boundary.
//!
//! The transport layer is out of scope, but its contract is not: requests
//! arrive with the legacy Spanish field names and string identifiers, and
//! responses answer with a fixed camelCase shape. Everything here converts
//! between that contract and the typed domain inputs.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use reparto_shared::types::SaleId;

use crate::distribution::DistributionFlag;
use crate::sale::error::SaleError;
use crate::sale::types::{CreateSaleInput, CreateSaleOutput, PaymentStatus};

fn default_true() -> bool {
    true
}

fn parse_id<T: FromStr>(raw: &str, field: &'static str) -> Result<T, SaleError> {
    raw.parse().map_err(|_| SaleError::InvalidIdentifier {
        field,
        value: raw.to_string(),
    })
}

/// Request to create a sale, as it arrives on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    /// The buying client's ID.
    pub client_id: String,
    /// Units sold.
    pub cantidad: i64,
    /// Sale price per unit.
    pub precio_venta_unidad: Decimal,
    /// Cost price per unit.
    pub precio_compra_unidad: Decimal,
    /// Freight price per unit.
    #[serde(default)]
    pub precio_flete_unidad: Decimal,
    /// Amount paid at creation time.
    #[serde(default)]
    pub monto_pagado: Decimal,
    /// Purchase order to draw stock from.
    #[serde(default)]
    pub oc_relacionada: Option<String>,
    /// Whether freight is routed to its own account.
    #[serde(default = "default_true")]
    pub aplicar_flete: bool,
    /// Optional free-form notes.
    #[serde(default)]
    pub notas: Option<String>,
}

impl TryFrom<CreateSaleRequest> for CreateSaleInput {
    type Error = SaleError;

    fn try_from(request: CreateSaleRequest) -> Result<Self, Self::Error> {
        let client_id = parse_id(&request.client_id, "clientId")?;
        let order_id = request
            .oc_relacionada
            .as_deref()
            .map(|raw| parse_id(raw, "ocRelacionada"))
            .transpose()?;

        Ok(Self {
            client_id,
            order_id,
            quantity: request.cantidad,
            unit_price: request.precio_venta_unidad,
            unit_cost: request.precio_compra_unidad,
            unit_freight: request.precio_flete_unidad,
            apply_freight: request.aplicar_flete,
            initial_payment: request.monto_pagado,
            notes: request.notas,
        })
    }
}

/// Request to register a payment. `montoPagado` carries the new cumulative
/// paid total, not a delta.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPaymentRequest {
    /// The target sale's ID.
    pub sale_id: String,
    /// New cumulative paid total.
    pub monto_pagado: Decimal,
}

impl RegisterPaymentRequest {
    /// Parses the target sale ID.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` if the ID is not a valid UUID.
    pub fn target(&self) -> Result<SaleId, SaleError> {
        parse_id(&self.sale_id, "saleId")
    }
}

/// Request to delete a sale.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSaleRequest {
    /// The target sale's ID.
    pub sale_id: String,
}

impl DeleteSaleRequest {
    /// Parses the target sale ID.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` if the ID is not a valid UUID.
    pub fn target(&self) -> Result<SaleId, SaleError> {
        parse_id(&self.sale_id, "saleId")
    }
}

/// Response to a successful sale creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleResponse {
    /// The new sale's ID.
    pub sale_id: SaleId,
    /// The three distributed amounts.
    pub distribution: DistributionSummary,
    /// Payment status after the initial payment.
    pub payment_status: PaymentStatus,
    /// Total sale amount.
    pub total: Decimal,
    /// Non-fatal integrity flags raised during distribution.
    pub flags: Vec<DistributionFlag>,
}

/// The three distributed amounts as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSummary {
    /// Cost-recovery share.
    pub cost: Decimal,
    /// Freight share.
    pub freight: Decimal,
    /// Profit share.
    pub profit: Decimal,
}

impl From<CreateSaleOutput> for CreateSaleResponse {
    fn from(output: CreateSaleOutput) -> Self {
        Self {
            sale_id: output.sale_id,
            distribution: DistributionSummary {
                cost: output.distribution.cost,
                freight: output.distribution.freight,
                profit: output.distribution.profit,
            },
            payment_status: output.status,
            total: output.distribution.total,
            flags: output.flags,
        }
    }
}

/// Positive acknowledgement for payment and delete operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    /// Always true; failures travel as error responses instead.
    pub success: bool,
}

impl AckResponse {
    /// The affirmative acknowledgement.
    #[must_use]
    pub const fn ok() -> Self {
        Self { success: true }
    }
}
