// Recognition and construction of the standard verification scripts.

use crate::crypto::{PublicKey, PUBLIC_KEY_COMPRESSED_SIZE};

pub mod opcode {
    pub const PUSHBYTES1: u8 = 0x01;
    pub const PUSHBYTES2: u8 = 0x02;
    pub const PUSHBYTES33: u8 = 0x21;
    pub const PUSHBYTES75: u8 = 0x4b;
    pub const PUSHDATA1: u8 = 0x4c;
    pub const PUSH1: u8 = 0x51;
    pub const PUSH16: u8 = 0x60;
    pub const CHECKSIG: u8 = 0xac;
    pub const CHECKMULTISIG: u8 = 0xae;
}

// Maximum number of keys a multi-signature script may reference
const MAX_MULTISIG_KEYS: usize = 1024;

// Push `data` with the shortest push instruction
fn emit_push_bytes(script: &mut Vec<u8>, data: &[u8]) {
    if data.len() <= opcode::PUSHBYTES75 as usize {
        script.push(data.len() as u8);
    } else if data.len() <= u8::MAX as usize {
        script.push(opcode::PUSHDATA1);
        script.push(data.len() as u8);
    } else {
        script.push(opcode::PUSHDATA1 + 1);
        script.extend_from_slice(&(data.len() as u16).to_le_bytes());
    }
    script.extend_from_slice(data);
}

fn emit_push_int(script: &mut Vec<u8>, value: usize) {
    if (1..=16).contains(&value) {
        script.push(opcode::PUSH1 + value as u8 - 1);
    } else if value <= u8::MAX as usize {
        script.push(opcode::PUSHBYTES1);
        script.push(value as u8);
    } else {
        script.push(opcode::PUSHBYTES2);
        script.extend_from_slice(&(value as u16).to_le_bytes());
    }
}

// Canonical single signature verification script: <key> CHECKSIG
pub fn create_signature_redeem_script(key: &PublicKey) -> Vec<u8> {
    let mut script = Vec::with_capacity(PUBLIC_KEY_COMPRESSED_SIZE + 2);
    emit_push_bytes(&mut script, &key.to_bytes());
    script.push(opcode::CHECKSIG);
    script
}

// m-of-n verification script, keys are emitted in the given order
pub fn create_multisig_redeem_script(m: usize, keys: &[PublicKey]) -> Option<Vec<u8>> {
    if m == 0 || m > keys.len() || keys.len() > MAX_MULTISIG_KEYS {
        return None;
    }
    let mut script = Vec::new();
    emit_push_int(&mut script, m);
    for key in keys {
        emit_push_bytes(&mut script, &key.to_bytes());
    }
    emit_push_int(&mut script, keys.len());
    script.push(opcode::CHECKMULTISIG);
    Some(script)
}

pub fn is_signature_contract(script: &[u8]) -> bool {
    script.len() == PUBLIC_KEY_COMPRESSED_SIZE + 2
        && script[0] == opcode::PUSHBYTES33
        && script[PUBLIC_KEY_COMPRESSED_SIZE + 1] == opcode::CHECKSIG
}

// Read a small integer push at `offset`, returning the value and the next offset
fn parse_push_int(script: &[u8], offset: usize) -> Option<(usize, usize)> {
    let op = *script.get(offset)?;
    match op {
        opcode::PUSH1..=opcode::PUSH16 => Some(((op - opcode::PUSH1 + 1) as usize, offset + 1)),
        opcode::PUSHBYTES1 => Some((*script.get(offset + 1)? as usize, offset + 2)),
        opcode::PUSHBYTES2 => {
            let bytes = script.get(offset + 1..offset + 3)?;
            Some((u16::from_le_bytes([bytes[0], bytes[1]]) as usize, offset + 3))
        }
        _ => None,
    }
}

pub fn is_multisig_contract(script: &[u8]) -> bool {
    let Some((m, mut offset)) = parse_push_int(script, 0) else {
        return false;
    };
    if m < 1 || m > MAX_MULTISIG_KEYS {
        return false;
    }

    let mut n = 0;
    while script.get(offset) == Some(&opcode::PUSHBYTES33) {
        offset += PUBLIC_KEY_COMPRESSED_SIZE + 1;
        if offset > script.len() {
            return false;
        }
        n += 1;
    }
    if n < m || n > MAX_MULTISIG_KEYS {
        return false;
    }

    match parse_push_int(script, offset) {
        Some((count, next)) if count == n => {
            next + 1 == script.len() && script[next] == opcode::CHECKMULTISIG
        }
        _ => false,
    }
}

// Standard scripts are the ones wallets know how to sign for
pub fn is_standard_contract(script: &[u8]) -> bool {
    is_signature_contract(script) || is_multisig_contract(script)
}
