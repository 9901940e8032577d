//! ALU byte primitives.
//!
//! Arithmetic works on the widened result: carry is set when the raw result
//! leaves `0..=255`. Shifts and rotates report the bit shifted out as carry
//! and set only the zero flag beside it.

use irata_spec::AluOpcode;

/// Value and flags produced by one ALU operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AluOutput {
    pub value: u8,
    pub carry: bool,
    pub zero: bool,
    pub negative: bool,
    pub overflow: bool,
}

impl AluOutput {
    fn arithmetic(lhs: u8, rhs: u8, raw: i32, overflow: fn(u8, u8, u8) -> bool) -> Self {
        let value = raw as u8;
        Self {
            value,
            carry: !(0..=0xff).contains(&raw),
            zero: value == 0,
            negative: value & 0x80 != 0,
            overflow: overflow(lhs, rhs, value),
        }
    }

    fn logic(value: u8) -> Self {
        Self {
            value,
            zero: value == 0,
            negative: value & 0x80 != 0,
            ..Self::default()
        }
    }

    fn shifted(value: u8, carry: bool) -> Self {
        Self {
            value,
            carry,
            zero: value == 0,
            ..Self::default()
        }
    }
}

fn add_overflow(lhs: u8, rhs: u8, value: u8) -> bool {
    !(lhs ^ rhs) & (lhs ^ value) & 0x80 != 0
}

fn sub_overflow(lhs: u8, rhs: u8, value: u8) -> bool {
    (lhs ^ rhs) & (lhs ^ value) & 0x80 != 0
}

pub fn compute(opcode: AluOpcode, lhs: u8, rhs: u8, carry_in: bool) -> AluOutput {
    let carry = i32::from(carry_in);
    match opcode {
        AluOpcode::Add => {
            let raw = i32::from(lhs) + i32::from(rhs) + carry;
            AluOutput::arithmetic(lhs, rhs, raw, add_overflow)
        }
        AluOpcode::Subtract => {
            let raw = i32::from(lhs) - i32::from(rhs) - (1 - carry);
            AluOutput::arithmetic(lhs, rhs, raw, sub_overflow)
        }
        AluOpcode::And => AluOutput::logic(lhs & rhs),
        AluOpcode::Or => AluOutput::logic(lhs | rhs),
        AluOpcode::Xor => AluOutput::logic(lhs ^ rhs),
        AluOpcode::ShiftLeft => AluOutput::shifted(lhs << 1, lhs & 0x80 != 0),
        AluOpcode::ShiftRight => AluOutput::shifted(lhs >> 1, lhs & 0x01 != 0),
        AluOpcode::RotateLeft => AluOutput::shifted((lhs << 1) | carry as u8, lhs & 0x80 != 0),
        AluOpcode::RotateRight => {
            AluOutput::shifted((lhs >> 1) | ((carry as u8) << 7), lhs & 0x01 != 0)
        }
    }
}
