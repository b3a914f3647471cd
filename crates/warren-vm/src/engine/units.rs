//! Execution units: pluggable instruction semantics.
//!
//! A unit registers one handler per opcode it implements; the engine rejects
//! a second handler for the same opcode. Handlers decode their own operands
//! with a cursor starting at `Ip` (which the engine has already advanced
//! past the opcode byte) and write the cursor's final position back into
//! `Ip` on success. Jump handlers write the branch target instead when
//! their condition holds.

use std::collections::HashMap;

use warren_bytecode::{Opcode, RegId};
use warren_core::{Cursor, Half};

use super::error::VmError;
use super::vm::{FLAG_SIGN, FLAG_ZERO, Vm};

/// One instruction's semantics.
pub type OpHandler = fn(&mut Vm) -> Result<(), VmError>;

/// Opcode byte to handler.
pub type OpTable = HashMap<u8, OpHandler>;

/// A bundle of instruction handlers.
pub trait Unit {
    /// Register every opcode this unit implements.
    fn register(&self, vm: &mut Vm) -> Result<(), VmError>;
}

/// Integer unit: loads, stores, moves, 16-bit wraparound arithmetic,
/// bitwise ops, compare, stack and jumps.
pub struct Alu;

impl Unit for Alu {
    fn register(&self, vm: &mut Vm) -> Result<(), VmError> {
        vm.register_op(Opcode::Loadi, loadi)?;
        vm.register_op(Opcode::Load, load)?;
        vm.register_op(Opcode::Storei, storei)?;
        vm.register_op(Opcode::Store, store)?;
        vm.register_op(Opcode::Move, mov)?;
        vm.register_op(Opcode::Add, |vm| calc(vm, |a, b| Ok(a.wrapping_add(b))))?;
        vm.register_op(Opcode::Sub, |vm| calc(vm, |a, b| Ok(a.wrapping_sub(b))))?;
        vm.register_op(Opcode::Mul, |vm| calc(vm, |a, b| Ok(a.wrapping_mul(b))))?;
        vm.register_op(Opcode::Div, |vm| {
            calc(vm, |a, b| {
                if b == 0 {
                    Err(VmError::DivideByZero)
                } else {
                    Ok(a / b)
                }
            })
        })?;
        vm.register_op(Opcode::And, |vm| calc(vm, |a, b| Ok(a & b)))?;
        vm.register_op(Opcode::Or, |vm| calc(vm, |a, b| Ok(a | b)))?;
        vm.register_op(Opcode::Xor, |vm| calc(vm, |a, b| Ok(a ^ b)))?;
        vm.register_op(Opcode::Cmp, cmp)?;
        vm.register_op(Opcode::Push, push)?;
        vm.register_op(Opcode::Pop, pop)?;
        vm.register_op(Opcode::Jmp, |vm| branch(vm, |_| true))?;
        vm.register_op(Opcode::Je, |vm| branch(vm, |vm| vm.flag(FLAG_ZERO)))?;
        vm.register_op(Opcode::Jne, |vm| branch(vm, |vm| !vm.flag(FLAG_ZERO)))?;
        vm.register_op(Opcode::Jg, |vm| {
            branch(vm, |vm| !vm.flag(FLAG_SIGN) && !vm.flag(FLAG_ZERO))
        })?;
        vm.register_op(Opcode::Jge, |vm| {
            branch(vm, |vm| vm.flag(FLAG_ZERO) || !vm.flag(FLAG_SIGN))
        })?;
        vm.register_op(Opcode::Jl, |vm| branch(vm, |vm| vm.flag(FLAG_SIGN)))?;
        // Kept bit-compatible with existing modules: JLE takes the branch
        // under the same condition as JGE.
        vm.register_op(Opcode::Jle, |vm| {
            branch(vm, |vm| vm.flag(FLAG_ZERO) || !vm.flag(FLAG_SIGN))
        })?;
        Ok(())
    }
}

/// Half-precision float unit: ADDF/SUBF/MULF/DIVF and CMPF.
///
/// Operands are half-precision bit patterns in registers; each operation
/// promotes to `f32`, computes, and demotes the result. Division by zero
/// follows IEEE semantics (infinity), not the integer fault path.
pub struct Fpu;

impl Unit for Fpu {
    fn register(&self, vm: &mut Vm) -> Result<(), VmError> {
        vm.register_op(Opcode::Addf, |vm| calc_f(vm, |a, b| a + b))?;
        vm.register_op(Opcode::Subf, |vm| calc_f(vm, |a, b| a - b))?;
        vm.register_op(Opcode::Mulf, |vm| calc_f(vm, |a, b| a * b))?;
        vm.register_op(Opcode::Divf, |vm| calc_f(vm, |a, b| a / b))?;
        vm.register_op(Opcode::Cmpf, cmpf)?;
        Ok(())
    }
}

fn loadi(vm: &mut Vm) -> Result<(), VmError> {
    let mut cur = Cursor::at(vm.code(), vm.ip());
    let reg = cur.read_u8()?;
    let imm = cur.read_u16()?;
    let end = cur.pos() as u16;

    vm.set_reg_raw(reg, imm)?;
    vm.set_reg(RegId::Ip, end);
    Ok(())
}

fn load(vm: &mut Vm) -> Result<(), VmError> {
    let mut cur = Cursor::at(vm.code(), vm.ip());
    let dst = cur.read_u8()?;
    let ptr = cur.read_u8()?;
    let end = cur.pos() as u16;

    let addr = vm.reg_raw(ptr)?;
    let value = vm.mem(addr)?;
    vm.set_reg_raw(dst, value)?;
    vm.set_reg(RegId::Ip, end);
    Ok(())
}

/// STOREI reg, imm: the register's value is stored at address `imm`.
fn storei(vm: &mut Vm) -> Result<(), VmError> {
    let mut cur = Cursor::at(vm.code(), vm.ip());
    let reg = cur.read_u8()?;
    let imm = cur.read_u16()?;
    let end = cur.pos() as u16;

    let value = vm.reg_raw(reg)?;
    vm.set_mem(imm, value)?;
    vm.set_reg(RegId::Ip, end);
    Ok(())
}

fn store(vm: &mut Vm) -> Result<(), VmError> {
    let mut cur = Cursor::at(vm.code(), vm.ip());
    let ptr = cur.read_u8()?;
    let src = cur.read_u8()?;
    let end = cur.pos() as u16;

    let addr = vm.reg_raw(ptr)?;
    let value = vm.reg_raw(src)?;
    vm.set_mem(addr, value)?;
    vm.set_reg(RegId::Ip, end);
    Ok(())
}

fn mov(vm: &mut Vm) -> Result<(), VmError> {
    let mut cur = Cursor::at(vm.code(), vm.ip());
    let dst = cur.read_u8()?;
    let src = cur.read_u8()?;
    let end = cur.pos() as u16;

    let value = vm.reg_raw(src)?;
    vm.set_reg_raw(dst, value)?;
    vm.set_reg(RegId::Ip, end);
    Ok(())
}

/// Three-register arithmetic: `dst = op(src, target)`.
fn calc(vm: &mut Vm, op: fn(u16, u16) -> Result<u16, VmError>) -> Result<(), VmError> {
    let mut cur = Cursor::at(vm.code(), vm.ip());
    let dst = cur.read_u8()?;
    let src = cur.read_u8()?;
    let target = cur.read_u8()?;
    let end = cur.pos() as u16;

    let value = op(vm.reg_raw(src)?, vm.reg_raw(target)?)?;
    vm.set_reg_raw(dst, value)?;
    vm.set_reg(RegId::Ip, end);
    Ok(())
}

/// Half-float arithmetic: promote both operands, compute, demote.
fn calc_f(vm: &mut Vm, op: fn(f32, f32) -> f32) -> Result<(), VmError> {
    let mut cur = Cursor::at(vm.code(), vm.ip());
    let dst = cur.read_u8()?;
    let src = cur.read_u8()?;
    let target = cur.read_u8()?;
    let end = cur.pos() as u16;

    let a = Half::from_bits(vm.reg_raw(src)?).to_f32();
    let b = Half::from_bits(vm.reg_raw(target)?).to_f32();
    let value = Half::from_f32(op(a, b)).to_bits();
    vm.set_reg_raw(dst, value)?;
    vm.set_reg(RegId::Ip, end);
    Ok(())
}

fn cmp(vm: &mut Vm) -> Result<(), VmError> {
    let mut cur = Cursor::at(vm.code(), vm.ip());
    let a = cur.read_u8()?;
    let b = cur.read_u8()?;
    let end = cur.pos() as u16;

    let diff = vm.reg_raw(a)? as i32 - vm.reg_raw(b)? as i32;
    vm.set_flag(FLAG_ZERO, diff == 0);
    vm.set_flag(FLAG_SIGN, diff < 0);
    vm.set_reg(RegId::Ip, end);
    Ok(())
}

fn cmpf(vm: &mut Vm) -> Result<(), VmError> {
    let mut cur = Cursor::at(vm.code(), vm.ip());
    let a = cur.read_u8()?;
    let b = cur.read_u8()?;
    let end = cur.pos() as u16;

    let diff = Half::from_bits(vm.reg_raw(a)?).to_f32() - Half::from_bits(vm.reg_raw(b)?).to_f32();
    vm.set_flag(FLAG_ZERO, diff == 0.0);
    vm.set_flag(FLAG_SIGN, diff < 0.0);
    vm.set_reg(RegId::Ip, end);
    Ok(())
}

fn push(vm: &mut Vm) -> Result<(), VmError> {
    let mut cur = Cursor::at(vm.code(), vm.ip());
    let reg = cur.read_u8()?;
    let end = cur.pos() as u16;

    let sp = vm.reg(RegId::Sp);
    let value = vm.reg_raw(reg)?;
    vm.set_mem(sp, value)?;
    vm.set_reg(RegId::Sp, sp.wrapping_sub(1));
    vm.set_reg(RegId::Ip, end);
    Ok(())
}

fn pop(vm: &mut Vm) -> Result<(), VmError> {
    let mut cur = Cursor::at(vm.code(), vm.ip());
    let reg = cur.read_u8()?;
    let end = cur.pos() as u16;

    let sp = vm.reg(RegId::Sp).wrapping_add(1);
    let value = vm.mem(sp)?;
    vm.set_reg(RegId::Sp, sp);
    vm.set_reg_raw(reg, value)?;
    vm.set_reg(RegId::Ip, end);
    Ok(())
}

fn branch(vm: &mut Vm, cond: fn(&Vm) -> bool) -> Result<(), VmError> {
    let mut cur = Cursor::at(vm.code(), vm.ip());
    let target = cur.read_u16()?;
    let end = cur.pos() as u16;

    let next = if cond(vm) { target } else { end };
    vm.set_reg(RegId::Ip, next);
    Ok(())
}
