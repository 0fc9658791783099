//! Panel builders for the dashboard.
//!
//! Row functions turn snapshot data into display strings; the panel
//! functions wrap those rows in ratatui widgets.

use ratatui::{
    layout::{Alignment, Constraint},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

use crate::core::{CpuInfo, DiskInfo, MemoryInfo, UptimeInfo};
use crate::utils::{format_flags, format_gb, format_gb_with_percent, format_mhz, format_percent, NOT_AVAILABLE};

pub const CPU_TITLE: &str = "CPU Info";
pub const MEMORY_TITLE: &str = "Memory Info";
pub const DISK_TITLE: &str = "Disk Usage";
pub const UPTIME_TITLE: &str = "System Uptime";

pub const DISK_HEADERS: [&str; 7] = ["Device", "Mountpoint", "Type", "Total", "Used", "Free", "Usage"];

/// Lines the disk table spends on anything but partition rows
pub const DISK_TABLE_CHROME: u16 = 3;

/// Width of the right-aligned label column ("Current Frequency")
pub const LABEL_WIDTH: usize = 17;

pub fn cpu_rows(cpu: &CpuInfo) -> Vec<(&'static str, String)> {
    let (max, current) = match cpu.frequency {
        Some(freq) => (format_mhz(freq.max_mhz), format_mhz(freq.current_mhz)),
        None => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
    };

    vec![
        ("Brand", cpu.brand.clone()),
        ("Architecture", cpu.architecture.clone()),
        ("Bits", cpu.bits.to_string()),
        (
            "Physical cores",
            cpu.physical_cores
                .map(|n| n.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        ("Logical threads", cpu.logical_threads.to_string()),
        ("Max Frequency", max),
        ("Current Frequency", current),
        ("Flags", format_flags(&cpu.flags)),
    ]
}

pub fn memory_rows(memory: &MemoryInfo) -> Vec<(&'static str, String)> {
    vec![
        ("Total RAM", format_gb(memory.total)),
        ("Used RAM", format_gb_with_percent(memory.used, memory.percent)),
        ("Available RAM", format_gb(memory.available)),
        ("Total Swap", format_gb(memory.swap_total)),
        ("Used Swap", format_gb_with_percent(memory.swap_used, memory.swap_percent)),
    ]
}

/// One row per partition, columns in [`DISK_HEADERS`] order
pub fn disk_rows(disks: &[DiskInfo]) -> Vec<[String; 7]> {
    disks
        .iter()
        .map(|disk| {
            [
                disk.device.clone(),
                disk.mount_point.display().to_string(),
                disk.fs_type.clone(),
                format_gb(disk.total),
                format_gb(disk.used),
                format_gb(disk.free),
                format_percent(disk.percent),
            ]
        })
        .collect()
}

/// Labelled rows as "label: value" lines, labels right-aligned
fn key_value_lines(rows: Vec<(&'static str, String)>) -> Vec<Line<'static>> {
    rows.into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{:>width$}: ", label, width = LABEL_WIDTH),
                    Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
                ),
                Span::styled(value, Style::default().fg(Color::White)),
            ])
        })
        .collect()
}

fn titled_block(title: &'static str, color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD)))
}

pub fn cpu_panel(cpu: &CpuInfo) -> Paragraph<'static> {
    Paragraph::new(key_value_lines(cpu_rows(cpu)))
        .wrap(Wrap { trim: false })
        .block(titled_block(CPU_TITLE, Color::Cyan))
}

pub fn memory_panel(memory: &MemoryInfo) -> Paragraph<'static> {
    Paragraph::new(key_value_lines(memory_rows(memory)))
        .block(titled_block(MEMORY_TITLE, Color::Magenta))
}

pub fn disk_table(disks: &[DiskInfo]) -> Table<'static> {
    let header = Row::new(
        DISK_HEADERS
            .iter()
            .map(|h| Cell::from(*h))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = disk_rows(disks)
        .into_iter()
        .map(|[device, mount, fs_type, total, used, free, usage]| {
            Row::new(vec![
                Cell::from(device),
                Cell::from(mount),
                Cell::from(Line::from(fs_type).alignment(Alignment::Center)),
                Cell::from(Line::from(total).alignment(Alignment::Right)),
                Cell::from(Line::from(used).alignment(Alignment::Right)),
                Cell::from(Line::from(free).alignment(Alignment::Right)),
                Cell::from(Line::from(usage).alignment(Alignment::Right)),
            ])
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Min(14),     // Device
            Constraint::Min(14),     // Mountpoint
            Constraint::Length(7),   // Type
            Constraint::Length(10),  // Total
            Constraint::Length(10),  // Used
            Constraint::Length(10),  // Free
            Constraint::Length(6),   // Usage
        ],
    )
    .header(header)
    .block(titled_block(DISK_TITLE, Color::Green))
}

pub fn uptime_panel(uptime: &UptimeInfo) -> Paragraph<'static> {
    Paragraph::new(Span::styled(
        uptime.to_string(),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ))
    .block(titled_block(UPTIME_TITLE, Color::Yellow))
}
