//! Minimal NES boot tests: tiny NROM images assembled by hand, run
//! through the full CPU + bus + PPU stack.

use emu_core::{Access, AddressSpace, BusError, Observable, Value};
use emu_nes::{DMA_STALL_CYCLES, Mirroring, Nes, NesConfig, NesError, UnmappedWritePolicy};
use mos_6502::CpuError;

/// 16K PRG with `code` at $8000, the reset vector at $8000 and the NMI
/// vector at `nmi`.
fn build_prg(code: &[u8], nmi: u16, handler: &[u8]) -> Vec<u8> {
    let mut prg = vec![0xEA; 0x4000];
    prg[..code.len()].copy_from_slice(code);

    let nmi_offset = usize::from(nmi - 0x8000);
    prg[nmi_offset..nmi_offset + handler.len()].copy_from_slice(handler);

    prg[0x3FFA..0x3FFC].copy_from_slice(&nmi.to_le_bytes());
    prg[0x3FFC..0x3FFE].copy_from_slice(&0x8000u16.to_le_bytes());
    prg
}

fn boot(code: &[u8]) -> Nes {
    let config = NesConfig {
        prg_rom: build_prg(code, 0x8100, &[0x40]),
        mirroring: Mirroring::Vertical,
        ..NesConfig::default()
    };
    Nes::new(&config).expect("create NES")
}

#[test]
fn store_then_jump_to_self() {
    // $8000: LDA #$01
    // $8002: STA $0000
    // $8005: JMP $8005
    let mut nes = boot(&[0xA9, 0x01, 0x8D, 0x00, 0x00, 0x4C, 0x05, 0x80]);

    assert_eq!(nes.step().unwrap(), 2);
    assert_eq!(nes.step().unwrap(), 4);
    assert_eq!(nes.query("memory.0x0000"), Some(Value::U8(1)));
    assert_eq!(nes.query("cpu.pc"), Some(Value::U16(0x8005)));

    // JMP to its own address is still a jump
    assert_eq!(nes.step().unwrap(), 3);
    assert_eq!(nes.query("cpu.pc"), Some(Value::U16(0x8005)));
}

#[test]
fn boots_through_two_vblank_waits() {
    // Standard init, then poll $2002 bit 7 twice, then idle
    let code: &[u8] = &[
        0x78, // SEI
        0xD8, // CLD
        0xA2, 0xFF, // LDX #$FF
        0x9A, // TXS
        0xAD, 0x02, 0x20, // vblank1: LDA $2002
        0x10, 0xFB, //          BPL vblank1
        0xAD, 0x02, 0x20, // vblank2: LDA $2002
        0x10, 0xFB, //          BPL vblank2
        0x4C, 0x0F, 0x80, // idle: JMP $800F
    ];
    let mut nes = boot(code);

    for _ in 0..3 {
        nes.run_frame().expect("frame");
    }

    assert_eq!(nes.cpu().regs.pc, 0x800F, "CPU should reach the idle loop");
    assert_eq!(nes.cpu().regs.s, 0xFF);
    assert_eq!(nes.frame_count(), 3);
}

#[test]
fn nmi_handler_runs_once_per_vblank() {
    // $8000: LDA #$80
    // $8002: STA $2000   (enable NMI)
    // $8005: JMP $8005
    // $8100: INC $00 ; RTI
    let code: &[u8] = &[0xA9, 0x80, 0x8D, 0x00, 0x20, 0x4C, 0x05, 0x80];
    let config = NesConfig {
        prg_rom: build_prg(code, 0x8100, &[0xEE, 0x00, 0x00, 0x40]),
        ..NesConfig::default()
    };
    let mut nes = Nes::new(&config).expect("create NES");

    // The first frame ends at post-render, before its vblank
    for _ in 0..3 {
        nes.run_frame().expect("frame");
    }

    assert_eq!(nes.query("memory.0x0000"), Some(Value::U8(2)));
    assert_eq!(nes.cpu().regs.pc, 0x8005);
    assert_eq!(nes.cpu().regs.s, 0xFD, "RTI balanced the stack");
}

#[test]
fn oam_dma_stalls_the_cpu() {
    // $8000: LDA #$02
    // $8002: STA $4014
    let mut nes = boot(&[0xA9, 0x02, 0x8D, 0x14, 0x40, 0x4C, 0x05, 0x80]);
    for i in 0..=0xFFu8 {
        nes.bus_mut().write8(0x0200 + u16::from(i), !i).unwrap();
    }

    nes.step().unwrap();
    assert_eq!(nes.step().unwrap(), 4 + DMA_STALL_CYCLES);

    let oam = nes.bus().ppu().oam();
    assert_eq!(oam[0], 0xFF);
    assert_eq!(oam[0xFF], 0x00);
    assert_eq!(nes.bus().ppu().dot(), (6 + 3 * (4 + DMA_STALL_CYCLES as u16)) % 341);
}

#[test]
fn unmapped_read_stops_the_machine() {
    // $8000: LDA $5000
    let mut nes = boot(&[0xAD, 0x00, 0x50]);
    let err = nes.step().unwrap_err();
    assert!(matches!(
        err,
        NesError::Cpu(CpuError::Bus {
            pc: 0x8000,
            source: BusError::Unmapped {
                addr: 0x5000,
                access: Access::Read
            }
        })
    ));
}

#[test]
fn unmapped_write_policy() {
    // $8000: STA $4020
    let code = [0x8D, 0x20, 0x40];

    let mut nes = boot(&code);
    assert!(nes.step().is_ok(), "ignored by default");

    let config = NesConfig {
        prg_rom: build_prg(&code, 0x8100, &[0x40]),
        unmapped_writes: UnmappedWritePolicy::Fatal,
        ..NesConfig::default()
    };
    let mut nes = Nes::new(&config).expect("create NES");
    assert!(matches!(
        nes.step(),
        Err(NesError::Cpu(CpuError::Bus {
            source: BusError::Unmapped {
                access: Access::Write,
                ..
            },
            ..
        }))
    ));
}

#[test]
fn chr_ram_written_through_ppudata() {
    // $8000: LDA #$00 ; STA $2006 ; STA $2006 ; LDA #$5A ; STA $2007
    let code: &[u8] = &[
        0xA9, 0x00, 0x8D, 0x06, 0x20, 0x8D, 0x06, 0x20, 0xA9, 0x5A, 0x8D, 0x07, 0x20,
    ];
    let mut nes = boot(code);
    for _ in 0..5 {
        nes.step().unwrap();
    }

    // Read it back: reset the address, dummy read, real read
    let bus = nes.bus_mut();
    bus.write8(0x2006, 0x00).unwrap();
    bus.write8(0x2006, 0x00).unwrap();
    bus.read8(0x2007).unwrap();
    assert_eq!(bus.read8(0x2007).unwrap(), 0x5A);
}
