//! SM83 opcode tables.
//!
//! The primary table covers every byte value. Templates carry at most one `{}`
//! slot, filled according to the entry's [`Operand`] shape. Encodings the CPU
//! does not define decode as a one-byte `db $xx` placeholder.

/// Escape byte selecting the [`CB_OPCODES`] table.
pub const PREFIX_CB: u8 = 0xCB;

/// Shape of the bytes following an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    None,
    /// Immediate byte, printed as `$xx`.
    Imm8,
    /// Signed displacement of a relative jump.
    Rel8,
    /// Low byte of a `$ff00+n` address.
    HighRam,
    /// Index into the CB table.
    Prefix,
    /// Little-endian 16-bit pointer or immediate.
    Imm16,
}

impl Operand {
    /// Number of operand bytes following the opcode.
    pub const fn len(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Imm8 | Self::Rel8 | Self::HighRam | Self::Prefix => 1,
            Self::Imm16 => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub template: &'static str,
    pub operand: Operand,
}

impl Opcode {
    /// Total encoded length including the opcode byte.
    pub const fn size(&self) -> u8 {
        1 + self.operand.len()
    }
}

const fn none(template: &'static str) -> Opcode {
    Opcode {
        template,
        operand: Operand::None,
    }
}

const fn imm8(template: &'static str) -> Opcode {
    Opcode {
        template,
        operand: Operand::Imm8,
    }
}

const fn rel8(template: &'static str) -> Opcode {
    Opcode {
        template,
        operand: Operand::Rel8,
    }
}

const fn hram(template: &'static str) -> Opcode {
    Opcode {
        template,
        operand: Operand::HighRam,
    }
}

const fn prefix() -> Opcode {
    Opcode {
        template: "{}",
        operand: Operand::Prefix,
    }
}

const fn imm16(template: &'static str) -> Opcode {
    Opcode {
        template,
        operand: Operand::Imm16,
    }
}

#[rustfmt::skip]
pub static OPCODES: [Opcode; 256] = [
    none("nop"),                         // 00
    imm16("ld bc, {}"),                  // 01
    none("ld [bc], a"),                  // 02
    none("inc bc"),                      // 03
    none("inc b"),                       // 04
    none("dec b"),                       // 05
    imm8("ld b, {}"),                    // 06
    none("rlca"),                        // 07
    imm16("ld [{}], sp"),                // 08
    none("add hl, bc"),                  // 09
    none("ld a, [bc]"),                  // 0a
    none("dec bc"),                      // 0b
    none("inc c"),                       // 0c
    none("dec c"),                       // 0d
    imm8("ld c, {}"),                    // 0e
    none("rrca"),                        // 0f
    none("db $10"),                      // 10
    imm16("ld de, {}"),                  // 11
    none("ld [de], a"),                  // 12
    none("inc de"),                      // 13
    none("inc d"),                       // 14
    none("dec d"),                       // 15
    imm8("ld d, {}"),                    // 16
    none("rla"),                         // 17
    rel8("jr {}"),                       // 18
    none("add hl, de"),                  // 19
    none("ld a, [de]"),                  // 1a
    none("dec de"),                      // 1b
    none("inc e"),                       // 1c
    none("dec e"),                       // 1d
    imm8("ld e, {}"),                    // 1e
    none("rra"),                         // 1f
    rel8("jr nz, {}"),                   // 20
    imm16("ld hl, {}"),                  // 21
    none("ld [hli], a"),                 // 22
    none("inc hl"),                      // 23
    none("inc h"),                       // 24
    none("dec h"),                       // 25
    imm8("ld h, {}"),                    // 26
    none("daa"),                         // 27
    rel8("jr z, {}"),                    // 28
    none("add hl, hl"),                  // 29
    none("ld a, [hli]"),                 // 2a
    none("dec hl"),                      // 2b
    none("inc l"),                       // 2c
    none("dec l"),                       // 2d
    imm8("ld l, {}"),                    // 2e
    none("cpl"),                         // 2f
    rel8("jr nc, {}"),                   // 30
    imm16("ld sp, {}"),                  // 31
    none("ld [hld], a"),                 // 32
    none("inc sp"),                      // 33
    none("inc [hl]"),                    // 34
    none("dec [hl]"),                    // 35
    imm8("ld [hl], {}"),                 // 36
    none("scf"),                         // 37
    rel8("jr c, {}"),                    // 38
    none("add hl, sp"),                  // 39
    none("ld a, [hld]"),                 // 3a
    none("dec sp"),                      // 3b
    none("inc a"),                       // 3c
    none("dec a"),                       // 3d
    imm8("ld a, {}"),                    // 3e
    none("ccf"),                         // 3f
    none("ld b, b"),                     // 40
    none("ld b, c"),                     // 41
    none("ld b, d"),                     // 42
    none("ld b, e"),                     // 43
    none("ld b, h"),                     // 44
    none("ld b, l"),                     // 45
    none("ld b, [hl]"),                  // 46
    none("ld b, a"),                     // 47
    none("ld c, b"),                     // 48
    none("ld c, c"),                     // 49
    none("ld c, d"),                     // 4a
    none("ld c, e"),                     // 4b
    none("ld c, h"),                     // 4c
    none("ld c, l"),                     // 4d
    none("ld c, [hl]"),                  // 4e
    none("ld c, a"),                     // 4f
    none("ld d, b"),                     // 50
    none("ld d, c"),                     // 51
    none("ld d, d"),                     // 52
    none("ld d, e"),                     // 53
    none("ld d, h"),                     // 54
    none("ld d, l"),                     // 55
    none("ld d, [hl]"),                  // 56
    none("ld d, a"),                     // 57
    none("ld e, b"),                     // 58
    none("ld e, c"),                     // 59
    none("ld e, d"),                     // 5a
    none("ld e, e"),                     // 5b
    none("ld e, h"),                     // 5c
    none("ld e, l"),                     // 5d
    none("ld e, [hl]"),                  // 5e
    none("ld e, a"),                     // 5f
    none("ld h, b"),                     // 60
    none("ld h, c"),                     // 61
    none("ld h, d"),                     // 62
    none("ld h, e"),                     // 63
    none("ld h, h"),                     // 64
    none("ld h, l"),                     // 65
    none("ld h, [hl]"),                  // 66
    none("ld h, a"),                     // 67
    none("ld l, b"),                     // 68
    none("ld l, c"),                     // 69
    none("ld l, d"),                     // 6a
    none("ld l, e"),                     // 6b
    none("ld l, h"),                     // 6c
    none("ld l, l"),                     // 6d
    none("ld l, [hl]"),                  // 6e
    none("ld l, a"),                     // 6f
    none("ld [hl], b"),                  // 70
    none("ld [hl], c"),                  // 71
    none("ld [hl], d"),                  // 72
    none("ld [hl], e"),                  // 73
    none("ld [hl], h"),                  // 74
    none("ld [hl], l"),                  // 75
    none("halt"),                        // 76
    none("ld [hl], a"),                  // 77
    none("ld a, b"),                     // 78
    none("ld a, c"),                     // 79
    none("ld a, d"),                     // 7a
    none("ld a, e"),                     // 7b
    none("ld a, h"),                     // 7c
    none("ld a, l"),                     // 7d
    none("ld a, [hl]"),                  // 7e
    none("ld a, a"),                     // 7f
    none("add b"),                       // 80
    none("add c"),                       // 81
    none("add d"),                       // 82
    none("add e"),                       // 83
    none("add h"),                       // 84
    none("add l"),                       // 85
    none("add [hl]"),                    // 86
    none("add a"),                       // 87
    none("adc b"),                       // 88
    none("adc c"),                       // 89
    none("adc d"),                       // 8a
    none("adc e"),                       // 8b
    none("adc h"),                       // 8c
    none("adc l"),                       // 8d
    none("adc [hl]"),                    // 8e
    none("adc a"),                       // 8f
    none("sub b"),                       // 90
    none("sub c"),                       // 91
    none("sub d"),                       // 92
    none("sub e"),                       // 93
    none("sub h"),                       // 94
    none("sub l"),                       // 95
    none("sub [hl]"),                    // 96
    none("sub a"),                       // 97
    none("sbc b"),                       // 98
    none("sbc c"),                       // 99
    none("sbc d"),                       // 9a
    none("sbc e"),                       // 9b
    none("sbc h"),                       // 9c
    none("sbc l"),                       // 9d
    none("sbc [hl]"),                    // 9e
    none("sbc a"),                       // 9f
    none("and b"),                       // a0
    none("and c"),                       // a1
    none("and d"),                       // a2
    none("and e"),                       // a3
    none("and h"),                       // a4
    none("and l"),                       // a5
    none("and [hl]"),                    // a6
    none("and a"),                       // a7
    none("xor b"),                       // a8
    none("xor c"),                       // a9
    none("xor d"),                       // aa
    none("xor e"),                       // ab
    none("xor h"),                       // ac
    none("xor l"),                       // ad
    none("xor [hl]"),                    // ae
    none("xor a"),                       // af
    none("or b"),                        // b0
    none("or c"),                        // b1
    none("or d"),                        // b2
    none("or e"),                        // b3
    none("or h"),                        // b4
    none("or l"),                        // b5
    none("or [hl]"),                     // b6
    none("or a"),                        // b7
    none("cp b"),                        // b8
    none("cp c"),                        // b9
    none("cp d"),                        // ba
    none("cp e"),                        // bb
    none("cp h"),                        // bc
    none("cp l"),                        // bd
    none("cp [hl]"),                     // be
    none("cp a"),                        // bf
    none("ret nz"),                      // c0
    none("pop bc"),                      // c1
    imm16("jp nz, {}"),                  // c2
    imm16("jp {}"),                      // c3
    imm16("call nz, {}"),                // c4
    none("push bc"),                     // c5
    imm8("add {}"),                      // c6
    none("rst $0"),                      // c7
    none("ret z"),                       // c8
    none("ret"),                         // c9
    imm16("jp z, {}"),                   // ca
    prefix(),                            // cb
    imm16("call z, {}"),                 // cc
    imm16("call {}"),                    // cd
    imm8("adc {}"),                      // ce
    none("rst $8"),                      // cf
    none("ret nc"),                      // d0
    none("pop de"),                      // d1
    imm16("jp nc, {}"),                  // d2
    none("db $d3"),                      // d3
    imm16("call nc, {}"),                // d4
    none("push de"),                     // d5
    imm8("sub {}"),                      // d6
    none("rst $10"),                     // d7
    none("ret c"),                       // d8
    none("reti"),                        // d9
    imm16("jp c, {}"),                   // da
    none("db $db"),                      // db
    imm16("call c, {}"),                 // dc
    none("db $dd"),                      // dd
    imm8("sbc {}"),                      // de
    none("rst $18"),                     // df
    hram("ld [{}], a"),                  // e0
    none("pop hl"),                      // e1
    none("ld [$ff00+c], a"),             // e2
    none("db $e3"),                      // e3
    none("db $e4"),                      // e4
    none("push hl"),                     // e5
    imm8("and {}"),                      // e6
    none("rst $20"),                     // e7
    imm8("add sp, {}"),                  // e8
    none("jp [hl]"),                     // e9
    imm16("ld [{}], a"),                 // ea
    none("db $eb"),                      // eb
    none("db $ec"),                      // ec
    none("db $ed"),                      // ed
    imm8("xor {}"),                      // ee
    none("rst $28"),                     // ef
    hram("ld a, [{}]"),                  // f0
    none("pop af"),                      // f1
    none("ld a, [$ff00+c]"),             // f2
    none("di"),                          // f3
    none("db $f4"),                      // f4
    none("push af"),                     // f5
    imm8("or {}"),                       // f6
    none("rst $30"),                     // f7
    imm8("ld hl, sp+{}"),                // f8
    none("ld sp, hl"),                   // f9
    imm16("ld a, [{}]"),                 // fa
    none("ei"),                          // fb
    none("db $fc"),                      // fc
    none("db $fd"),                      // fd
    imm8("cp {}"),                       // fe
    none("rst $38"),                     // ff
];

#[rustfmt::skip]
pub static CB_OPCODES: [&str; 256] = [
    "rlc b",    "rlc c",    "rlc d",    "rlc e",    "rlc h",    "rlc l",    "rlc [hl]",    "rlc a",    // 00
    "rrc b",    "rrc c",    "rrc d",    "rrc e",    "rrc h",    "rrc l",    "rrc [hl]",    "rrc a",    // 08
    "rl b",     "rl c",     "rl d",     "rl e",     "rl h",     "rl l",     "rl [hl]",     "rl a",     // 10
    "rr b",     "rr c",     "rr d",     "rr e",     "rr h",     "rr l",     "rr [hl]",     "rr a",     // 18
    "sla b",    "sla c",    "sla d",    "sla e",    "sla h",    "sla l",    "sla [hl]",    "sla a",    // 20
    "sra b",    "sra c",    "sra d",    "sra e",    "sra h",    "sra l",    "sra [hl]",    "sra a",    // 28
    "swap b",   "swap c",   "swap d",   "swap e",   "swap h",   "swap l",   "swap [hl]",   "swap a",   // 30
    "srl b",    "srl c",    "srl d",    "srl e",    "srl h",    "srl l",    "srl [hl]",    "srl a",    // 38
    "bit 0, b", "bit 0, c", "bit 0, d", "bit 0, e", "bit 0, h", "bit 0, l", "bit 0, [hl]", "bit 0, a", // 40
    "bit 1, b", "bit 1, c", "bit 1, d", "bit 1, e", "bit 1, h", "bit 1, l", "bit 1, [hl]", "bit 1, a", // 48
    "bit 2, b", "bit 2, c", "bit 2, d", "bit 2, e", "bit 2, h", "bit 2, l", "bit 2, [hl]", "bit 2, a", // 50
    "bit 3, b", "bit 3, c", "bit 3, d", "bit 3, e", "bit 3, h", "bit 3, l", "bit 3, [hl]", "bit 3, a", // 58
    "bit 4, b", "bit 4, c", "bit 4, d", "bit 4, e", "bit 4, h", "bit 4, l", "bit 4, [hl]", "bit 4, a", // 60
    "bit 5, b", "bit 5, c", "bit 5, d", "bit 5, e", "bit 5, h", "bit 5, l", "bit 5, [hl]", "bit 5, a", // 68
    "bit 6, b", "bit 6, c", "bit 6, d", "bit 6, e", "bit 6, h", "bit 6, l", "bit 6, [hl]", "bit 6, a", // 70
    "bit 7, b", "bit 7, c", "bit 7, d", "bit 7, e", "bit 7, h", "bit 7, l", "bit 7, [hl]", "bit 7, a", // 78
    "res 0, b", "res 0, c", "res 0, d", "res 0, e", "res 0, h", "res 0, l", "res 0, [hl]", "res 0, a", // 80
    "res 1, b", "res 1, c", "res 1, d", "res 1, e", "res 1, h", "res 1, l", "res 1, [hl]", "res 1, a", // 88
    "res 2, b", "res 2, c", "res 2, d", "res 2, e", "res 2, h", "res 2, l", "res 2, [hl]", "res 2, a", // 90
    "res 3, b", "res 3, c", "res 3, d", "res 3, e", "res 3, h", "res 3, l", "res 3, [hl]", "res 3, a", // 98
    "res 4, b", "res 4, c", "res 4, d", "res 4, e", "res 4, h", "res 4, l", "res 4, [hl]", "res 4, a", // a0
    "res 5, b", "res 5, c", "res 5, d", "res 5, e", "res 5, h", "res 5, l", "res 5, [hl]", "res 5, a", // a8
    "res 6, b", "res 6, c", "res 6, d", "res 6, e", "res 6, h", "res 6, l", "res 6, [hl]", "res 6, a", // b0
    "res 7, b", "res 7, c", "res 7, d", "res 7, e", "res 7, h", "res 7, l", "res 7, [hl]", "res 7, a", // b8
    "set 0, b", "set 0, c", "set 0, d", "set 0, e", "set 0, h", "set 0, l", "set 0, [hl]", "set 0, a", // c0
    "set 1, b", "set 1, c", "set 1, d", "set 1, e", "set 1, h", "set 1, l", "set 1, [hl]", "set 1, a", // c8
    "set 2, b", "set 2, c", "set 2, d", "set 2, e", "set 2, h", "set 2, l", "set 2, [hl]", "set 2, a", // d0
    "set 3, b", "set 3, c", "set 3, d", "set 3, e", "set 3, h", "set 3, l", "set 3, [hl]", "set 3, a", // d8
    "set 4, b", "set 4, c", "set 4, d", "set 4, e", "set 4, h", "set 4, l", "set 4, [hl]", "set 4, a", // e0
    "set 5, b", "set 5, c", "set 5, d", "set 5, e", "set 5, h", "set 5, l", "set 5, [hl]", "set 5, a", // e8
    "set 6, b", "set 6, c", "set 6, d", "set 6, e", "set 6, h", "set 6, l", "set 6, [hl]", "set 6, a", // f0
    "set 7, b", "set 7, c", "set 7, d", "set 7, e", "set 7, h", "set 7, l", "set 7, [hl]", "set 7, a", // f8
];

pub fn lookup(opcode: u8) -> &'static Opcode {
    &OPCODES[opcode as usize]
}

pub fn lookup_cb(opcode: u8) -> &'static str {
    CB_OPCODES[opcode as usize]
}

pub fn is_call(opcode: u8) -> bool {
    matches!(opcode, 0xCD | 0xC4 | 0xCC | 0xD4 | 0xDC)
}

pub fn is_absolute_jump(opcode: u8) -> bool {
    matches!(opcode, 0xC3 | 0xC2 | 0xCA | 0xD2 | 0xDA)
}

/// `jp a16`, `jr e8`, `ret` and `reti`: execution never falls through.
pub fn ends_flow(opcode: u8) -> bool {
    matches!(opcode, 0xC3 | 0x18 | 0xC9 | 0xD9)
}

/// Two's-complement value of a relative jump displacement.
pub const fn signed_byte(value: u8) -> i32 {
    if value >= 0x80 {
        value as i32 - 0x100
    } else {
        value as i32
    }
}
