use std::{convert::TryFrom, sync::Arc};

use ledger_common::{
    config::{
        MAX_CONTRACT_DESCRIPTION_LEN, MAX_CONTRACT_PARAMETERS_NUM, MAX_CONTRACT_SCRIPT_SIZE,
        MAX_CONTRACT_STRING_LEN,
    },
    contract::{ContractProperties, ContractState, ParamType},
    crypto::Uint160,
    storage::StorageItem,
};
use log::debug;

use crate::{
    bridge::{pop_interop, wrap},
    context::InteropContext,
    error::InteropError,
    storage::StorageContext,
    vm::{EvaluationStack, Engine},
};

fn check_len(field: &'static str, len: usize, max: usize) -> Result<(), InteropError> {
    if len > max {
        return Err(InteropError::FieldTooLarge { field, len, max });
    }
    Ok(())
}

// Size limits are part of the protocol, every node must reject the same states
pub fn validate_contract_state(state: &ContractState) -> Result<(), InteropError> {
    check_len("script", state.script.len(), MAX_CONTRACT_SCRIPT_SIZE)?;
    check_len("parameter list", state.param_list.len(), MAX_CONTRACT_PARAMETERS_NUM)?;
    check_len("name", state.name.len(), MAX_CONTRACT_STRING_LEN)?;
    check_len("version", state.code_version.len(), MAX_CONTRACT_STRING_LEN)?;
    check_len("author", state.author.len(), MAX_CONTRACT_STRING_LEN)?;
    check_len("email", state.email.len(), MAX_CONTRACT_STRING_LEN)?;
    check_len("description", state.description.len(), MAX_CONTRACT_DESCRIPTION_LEN)?;
    Ok(())
}

impl<'a> InteropContext<'a> {
    /// Deploy a contract, or return the already deployed one with the same
    /// script
    ///
    /// An existing contract is never overwritten and finding one is not an
    /// error.
    pub fn create_contract(&mut self, state: ContractState) -> Result<ContractState, InteropError> {
        self.require_application()?;
        validate_contract_state(&state)?;
        self.deploy_contract(state)
    }

    /// Replace `caller` by a new contract
    ///
    /// When the new contract did not exist yet and has storage, every item
    /// of `caller` is copied into its namespace as a non constant item.
    /// `caller` is destroyed in every case.
    pub fn migrate_contract(&mut self, state: ContractState, caller: &Uint160) -> Result<ContractState, InteropError> {
        self.require_application()?;
        validate_contract_state(&state)?;
        self.replace_contract(state, caller)
    }

    // Remove a contract and its storage, nothing to do when it does not exist
    pub fn destroy_contract(&mut self, hash: &Uint160) -> Result<(), InteropError> {
        self.require_application()?;
        self.remove_contract(hash)
    }

    // Only contracts deployed by this execution hand out their storage
    pub fn contract_storage_context(&self, contract: &ContractState) -> Result<StorageContext, InteropError> {
        let hash = contract.script_hash();
        if !self.staged().has_staged_contract(&hash) {
            return Err(InteropError::NotCreatedThisExecution(hash));
        }
        Ok(StorageContext::new(hash, false))
    }

    // The methods below expect the trigger and the state to be checked already

    fn deploy_contract(&mut self, state: ContractState) -> Result<ContractState, InteropError> {
        let hash = state.script_hash();
        if let Some(existing) = self.get_contract(&hash)? {
            debug!("contract {} already deployed", hash);
            return Ok(existing);
        }
        debug!("deploying contract {}", state);
        self.staged_mut().put_contract(state.clone());
        Ok(state)
    }

    fn replace_contract(&mut self, state: ContractState, caller: &Uint160) -> Result<ContractState, InteropError> {
        let hash = state.script_hash();
        let result = match self.get_contract(&hash)? {
            Some(existing) => existing,
            None => {
                debug!("migrating contract {} to {}", caller, hash);
                self.staged_mut().put_contract(state.clone());
                if state.has_storage() {
                    for (key, item) in self.get_storage_items(caller)? {
                        self.staged_mut()
                            .put_storage(&hash, &key, StorageItem::new(item.value, false));
                    }
                }
                state
            }
        };

        self.remove_contract(caller)?;
        Ok(result)
    }

    fn remove_contract(&mut self, hash: &Uint160) -> Result<(), InteropError> {
        let Some(contract) = self.get_contract(hash)? else {
            return Ok(());
        };

        debug!("destroying contract {}", hash);
        self.staged_mut().delete_contract(hash);
        if contract.has_storage() {
            let keys: Vec<Vec<u8>> = self.get_storage_items(hash)?.into_keys().collect();
            for key in keys {
                self.staged_mut().delete_storage(hash, &key);
            }
        }
        Ok(())
    }
}

// Lengths are checked on the popped bytes, before anything else is popped
fn pop_limited(stack: &mut EvaluationStack, field: &'static str, max: usize) -> Result<Vec<u8>, InteropError> {
    let bytes = stack.pop_bytes()?;
    check_len(field, bytes.len(), max)?;
    Ok(bytes)
}

// Pops script, parameter types, return type, properties, name, version,
// author, email and description, in that order
fn pop_contract_state(stack: &mut EvaluationStack) -> Result<ContractState, InteropError> {
    let script = pop_limited(stack, "script", MAX_CONTRACT_SCRIPT_SIZE)?;
    let param_list = pop_limited(stack, "parameter list", MAX_CONTRACT_PARAMETERS_NUM)?
        .into_iter()
        .map(ParamType::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let return_type = ParamType::try_from(stack.pop_u8()?)?;
    let properties = ContractProperties::from_bits(stack.pop_u8()?);

    Ok(ContractState {
        script,
        param_list,
        return_type,
        properties,
        name: pop_limited(stack, "name", MAX_CONTRACT_STRING_LEN)?,
        code_version: pop_limited(stack, "version", MAX_CONTRACT_STRING_LEN)?,
        author: pop_limited(stack, "author", MAX_CONTRACT_STRING_LEN)?,
        email: pop_limited(stack, "email", MAX_CONTRACT_STRING_LEN)?,
        description: pop_limited(stack, "description", MAX_CONTRACT_DESCRIPTION_LEN)?,
    })
}

// Create and Migrate fault on the trigger before popping anything

pub(crate) fn contract_create(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    ctx.require_application()?;
    let state = pop_contract_state(engine.evaluation_stack_mut())?;
    let contract = ctx.deploy_contract(state)?;
    engine.evaluation_stack_mut().push(wrap(Arc::new(contract)));
    Ok(())
}

pub(crate) fn contract_migrate(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    ctx.require_application()?;
    let state = pop_contract_state(engine.evaluation_stack_mut())?;
    let caller = engine.current_script_hash()?;
    let contract = ctx.replace_contract(state, &caller)?;
    engine.evaluation_stack_mut().push(wrap(Arc::new(contract)));
    Ok(())
}

// Destroys the executing contract
pub(crate) fn contract_destroy(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let hash = engine.current_script_hash()?;
    ctx.destroy_contract(&hash)
}

pub(crate) fn contract_get_script(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let contract: Arc<ContractState> = pop_interop(stack)?;
    stack.push(contract.script.clone());
    Ok(())
}

pub(crate) fn contract_is_payable(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let contract: Arc<ContractState> = pop_interop(stack)?;
    stack.push(contract.is_payable());
    Ok(())
}

pub(crate) fn contract_get_storage_context(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let contract: Arc<ContractState> = pop_interop(stack)?;
    let sc = ctx.contract_storage_context(&contract)?;
    stack.push(wrap(sc));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{events::EventLog, ledger::MemoryLedger};
    use ledger_common::trigger::TriggerType;

    fn state(script: Vec<u8>) -> ContractState {
        ContractState {
            script,
            param_list: vec![ParamType::ByteArray],
            return_type: ParamType::Boolean,
            properties: ContractProperties::HAS_STORAGE,
            name: "token".into(),
            code_version: "1".into(),
            author: "a".into(),
            email: "e".into(),
            description: "d".into(),
        }
    }

    #[test]
    fn test_size_limits() {
        let mut s = state(vec![0x51]);
        assert!(validate_contract_state(&s).is_ok());

        s.name = vec![b'n'; MAX_CONTRACT_STRING_LEN + 1];
        assert!(matches!(
            validate_contract_state(&s),
            Err(InteropError::FieldTooLarge { field: "name", len: 253, max: 252 })
        ));

        let mut s = state(vec![0x51]);
        s.description = vec![b'd'; MAX_CONTRACT_DESCRIPTION_LEN];
        assert!(validate_contract_state(&s).is_ok());
        s.param_list = vec![ParamType::Integer; MAX_CONTRACT_PARAMETERS_NUM + 1];
        assert!(matches!(
            validate_contract_state(&s),
            Err(InteropError::FieldTooLarge { field: "parameter list", .. })
        ));

        let s = state(vec![0u8; MAX_CONTRACT_SCRIPT_SIZE + 1]);
        assert!(matches!(
            validate_contract_state(&s),
            Err(InteropError::FieldTooLarge { field: "script", .. })
        ));
    }

    #[test]
    fn test_lifecycle_needs_application_trigger() {
        let ledger = MemoryLedger::new();
        let mut events = EventLog::new();
        let mut ctx = InteropContext::new(TriggerType::ApplicationR, &ledger, &mut events);
        assert!(matches!(
            ctx.create_contract(state(vec![0x51])),
            Err(InteropError::TriggerNotApplication { .. })
        ));
        assert!(matches!(
            ctx.destroy_contract(&Uint160::zero()),
            Err(InteropError::TriggerNotApplication { .. })
        ));
    }

    #[test]
    fn test_storage_context_only_for_new_contracts() {
        let ledger = MemoryLedger::new();
        let mut events = EventLog::new();
        let mut ctx = InteropContext::new(TriggerType::Application, &ledger, &mut events);

        let other = state(vec![0x52]);
        assert!(matches!(
            ctx.contract_storage_context(&other),
            Err(InteropError::NotCreatedThisExecution(_))
        ));

        let created = ctx.create_contract(state(vec![0x51])).unwrap();
        let sc = ctx.contract_storage_context(&created).unwrap();
        assert_eq!(*sc.script_hash(), created.script_hash());
        assert!(!sc.is_read_only());
    }

    #[test]
    fn test_pop_rejects_unknown_parameter_type() {
        let mut stack = EvaluationStack::new();
        for field in ["desc", "email", "author", "1.0", "name"] {
            stack.push(field.as_bytes());
        }
        stack.push(0u8);
        stack.push(0x05u8);
        stack.push(vec![0x05u8, 0x42]);
        stack.push(vec![0x51u8]);
        assert!(matches!(pop_contract_state(&mut stack), Err(InteropError::Decode(_))));
    }

    #[test]
    fn test_pop_order() {
        let mut stack = EvaluationStack::new();
        for field in ["desc", "email", "author", "1.0", "name"] {
            stack.push(field.as_bytes());
        }
        stack.push(0x05u8);
        stack.push(0xffu8);
        stack.push(vec![0x07u8, 0x10]);
        stack.push(vec![0x51u8, 0x66]);

        let s = pop_contract_state(&mut stack).unwrap();
        assert_eq!(s.script, vec![0x51, 0x66]);
        assert_eq!(s.param_list, vec![ParamType::String, ParamType::Array]);
        assert_eq!(s.return_type, ParamType::Void);
        assert!(s.has_storage() && s.is_payable());
        assert_eq!(s.name, b"name");
        assert_eq!(s.code_version, b"1.0");
        assert_eq!(s.description, b"desc");
        assert!(stack.is_empty());
    }

    #[test]
    fn test_limits_count_raw_bytes() {
        let mut stack = EvaluationStack::new();
        stack.push(vec![0xe9u8; MAX_CONTRACT_DESCRIPTION_LEN]);
        for _ in 0..4 {
            stack.push(vec![0xffu8; MAX_CONTRACT_STRING_LEN]);
        }
        stack.push(0x05u8);
        stack.push(0x00u8);
        stack.push(vec![0x05u8]);
        stack.push(vec![0x51u8]);

        let s = pop_contract_state(&mut stack).unwrap();
        assert_eq!(s.name, vec![0xff; MAX_CONTRACT_STRING_LEN]);
        assert_eq!(s.description.len(), MAX_CONTRACT_DESCRIPTION_LEN);
        assert!(validate_contract_state(&s).is_ok());
    }

    #[test]
    fn test_oversized_field_faults_before_later_pops() {
        let mut stack = EvaluationStack::new();
        stack.push(b"desc".as_slice());
        stack.push(vec![0u8; MAX_CONTRACT_STRING_LEN + 1]);
        stack.push(0x05u8);
        stack.push(0x00u8);
        stack.push(Vec::<u8>::new());
        stack.push(vec![0x51u8]);

        assert!(matches!(
            pop_contract_state(&mut stack),
            Err(InteropError::FieldTooLarge { field: "name", len: 253, max: 252 })
        ));
        // The description is still on the stack
        assert_eq!(stack.len(), 1);
    }
}
