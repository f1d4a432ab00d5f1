use std::{convert::TryFrom, sync::Arc};

use ledger_common::{
    asset::{AssetState, AssetType},
    config::{BLOCKS_PER_YEAR, DEFAULT_ASSET_LIFETIME, MAX_ASSET_NAME_LEN, MAX_ASSET_PRECISION},
    crypto::{Hashable, PublicKey, Uint160, Uint256},
    fixed8::Fixed8,
};
use log::{debug, log_enabled, Level};

use crate::{
    bridge::{pop_interop, wrap},
    context::InteropContext,
    error::InteropError,
    vm::{EvaluationStack, Engine, StackItem},
};

/// Parameters of an asset registered by a contract
#[derive(Clone, Debug)]
pub struct AssetSpec {
    pub asset_type: AssetType,
    pub name: Vec<u8>,
    pub amount: Fixed8,
    pub precision: u8,
    pub owner: PublicKey,
    pub admin: Uint160,
    pub issuer: Uint160,
}

fn invalid(field: &'static str, reason: impl Into<String>) -> InteropError {
    InteropError::InvalidAssetField {
        field,
        reason: reason.into(),
    }
}

fn check_type(asset_type: AssetType) -> Result<(), InteropError> {
    if !asset_type.is_contract_creatable() {
        return Err(invalid("type", format!("{:?} cannot be created by a contract", asset_type)));
    }
    Ok(())
}

// Raw byte length, names are not required to be UTF-8
fn check_name(name: &[u8]) -> Result<(), InteropError> {
    if name.len() > MAX_ASSET_NAME_LEN {
        return Err(invalid("name", format!("{} bytes, limit is {}", name.len(), MAX_ASSET_NAME_LEN)));
    }
    Ok(())
}

fn check_amount(asset_type: AssetType, amount: Fixed8) -> Result<(), InteropError> {
    let unbounded = -Fixed8::satoshi();
    if amount == Fixed8::zero() {
        return Err(invalid("amount", "zero"));
    }
    if amount < unbounded {
        return Err(invalid("amount", format!("{} is negative", amount)));
    }
    if asset_type == AssetType::Invoice && amount != unbounded {
        return Err(invalid("amount", "invoices must have an unbounded supply"));
    }
    Ok(())
}

fn check_precision(asset_type: AssetType, amount: Fixed8, precision: u8) -> Result<(), InteropError> {
    if precision > MAX_ASSET_PRECISION {
        return Err(invalid("precision", format!("{} above {}", precision, MAX_ASSET_PRECISION)));
    }
    if asset_type == AssetType::Share && precision != 0 {
        return Err(invalid("precision", "shares are indivisible"));
    }
    if amount != -Fixed8::satoshi() && !amount.fits_precision(precision) {
        return Err(invalid(
            "amount",
            format!("{} has digits below precision {}", amount, precision),
        ));
    }
    Ok(())
}

fn check_owner(owner: &PublicKey) -> Result<(), InteropError> {
    if owner.is_infinity() {
        return Err(invalid("owner", "point at infinity"));
    }
    Ok(())
}

impl AssetSpec {
    // Checks that do not depend on the chain
    pub fn validate(&self) -> Result<(), InteropError> {
        check_type(self.asset_type)?;
        check_name(&self.name)?;
        check_amount(self.asset_type, self.amount)?;
        check_precision(self.asset_type, self.amount, self.precision)?;
        check_owner(&self.owner)
    }
}

impl<'a> InteropContext<'a> {
    /// Register a new asset owned by `spec.owner`
    ///
    /// The owner must have witnessed the container. The asset id is the hash
    /// of the transaction being executed, so that container must be a
    /// transaction.
    pub fn create_asset(&mut self, spec: AssetSpec) -> Result<AssetState, InteropError> {
        self.require_application()?;
        spec.validate()?;
        self.require_owner_witness(&spec.owner)?;
        self.register_asset(spec)
    }

    // Extend the lifetime of an asset by `years`, returns the new expiration
    pub fn renew_asset(&mut self, id: &Uint256, years: u8) -> Result<u32, InteropError> {
        self.require_application()?;
        self.extend_asset(id, years)
    }

    fn require_owner_witness(&self, owner: &PublicKey) -> Result<(), InteropError> {
        if !self.check_keyed_witness(owner)? {
            return Err(InteropError::WitnessCheckFailed(owner.to_hex()));
        }
        Ok(())
    }

    // Stages an already checked asset
    fn register_asset(&mut self, spec: AssetSpec) -> Result<AssetState, InteropError> {
        let id = self.transaction()?.hash();
        let height = self.ledger().block_height()?;
        let asset = AssetState {
            id,
            asset_type: spec.asset_type,
            name: spec.name,
            amount: spec.amount,
            available: Fixed8::zero(),
            precision: spec.precision,
            owner: spec.owner,
            admin: spec.admin,
            issuer: spec.issuer,
            expiration: height.saturating_add(DEFAULT_ASSET_LIFETIME),
            is_frozen: false,
        };
        if log_enabled!(Level::Debug) {
            debug!(
                "registering asset {} '{}' until {}",
                asset.id,
                String::from_utf8_lossy(&asset.name),
                asset.expiration
            );
        }
        self.staged_mut().put_asset(asset.clone());
        Ok(asset)
    }

    fn extend_asset(&mut self, id: &Uint256, years: u8) -> Result<u32, InteropError> {
        let mut asset = self.get_asset(id)?.ok_or_else(|| InteropError::NotFound {
            kind: "asset",
            id: id.to_string(),
        })?;

        // An expired asset is renewed from the next block, not from its old expiration
        let next = self.ledger().block_height()?.saturating_add(1);
        let start = asset.expiration.max(next);
        let expiration = (start as u64 + years as u64 * BLOCKS_PER_YEAR as u64).min(u32::MAX as u64) as u32;

        if log_enabled!(Level::Debug) {
            debug!("renewing asset {} for {} years: {} -> {}", id, years, asset.expiration, expiration);
        }
        asset.expiration = expiration;
        self.staged_mut().put_asset(asset);
        Ok(expiration)
    }
}

// Pops type, name, amount, precision, owner, admin and issuer, in that order.
// Every field is checked as soon as it is popped and the owner witness is
// checked before admin and issuer are decoded.
fn pop_asset_spec(ctx: &InteropContext, stack: &mut EvaluationStack) -> Result<AssetSpec, InteropError> {
    let type_byte = stack.pop_u8()?;
    let asset_type =
        AssetType::try_from(type_byte).map_err(|_| invalid("type", format!("unknown type {:#04x}", type_byte)))?;
    check_type(asset_type)?;
    let name = stack.pop_bytes()?;
    check_name(&name)?;
    let amount = Fixed8::from_raw(stack.pop_i64()?);
    check_amount(asset_type, amount)?;
    let precision = stack.pop_u8()?;
    check_precision(asset_type, amount, precision)?;

    let owner = PublicKey::from_bytes(&stack.pop_bytes()?)?;
    check_owner(&owner)?;
    ctx.require_owner_witness(&owner)?;

    let admin = Uint160::decode_bytes(&stack.pop_bytes()?)?;
    let issuer = Uint160::decode_bytes(&stack.pop_bytes()?)?;

    Ok(AssetSpec {
        asset_type,
        name,
        amount,
        precision,
        owner,
        admin,
        issuer,
    })
}

// Create and Renew fault on the trigger before popping anything

pub(crate) fn asset_create(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    ctx.require_application()?;
    let spec = pop_asset_spec(ctx, engine.evaluation_stack_mut())?;
    let asset = ctx.register_asset(spec)?;
    engine.evaluation_stack_mut().push(wrap(Arc::new(asset)));
    Ok(())
}

pub(crate) fn asset_renew(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    ctx.require_application()?;
    let stack = engine.evaluation_stack_mut();
    let asset: Arc<AssetState> = pop_interop(stack)?;
    let years = stack.pop_u8()?;
    let expiration = ctx.extend_asset(&asset.id, years)?;
    stack.push(expiration);
    Ok(())
}

// Accessors all pop an asset handle and push one field
fn push_asset_field<F, T>(engine: &mut Engine, field: F) -> Result<(), InteropError>
where
    F: FnOnce(&AssetState) -> T,
    T: Into<StackItem>,
{
    let stack = engine.evaluation_stack_mut();
    let asset: Arc<AssetState> = pop_interop(stack)?;
    stack.push(field(&asset));
    Ok(())
}

pub(crate) fn asset_get_asset_id(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    push_asset_field(engine, |a| a.id.to_reversed_bytes().to_vec())
}

pub(crate) fn asset_get_asset_type(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    push_asset_field(engine, |a| a.asset_type.to_u8())
}

pub(crate) fn asset_get_amount(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    push_asset_field(engine, |a| a.amount.raw())
}

pub(crate) fn asset_get_available(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    push_asset_field(engine, |a| a.available.raw())
}

pub(crate) fn asset_get_precision(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    push_asset_field(engine, |a| a.precision)
}

pub(crate) fn asset_get_owner(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    push_asset_field(engine, |a| a.owner.to_bytes())
}

pub(crate) fn asset_get_admin(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    push_asset_field(engine, |a| a.admin.to_bytes().to_vec())
}

pub(crate) fn asset_get_issuer(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    push_asset_field(engine, |a| a.issuer.to_bytes().to_vec())
}
