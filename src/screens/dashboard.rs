//! Dashboard screen: lays out the four panels and paints them.

use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame, Terminal,
};
use std::io;

use crate::core::MetricsSnapshot;
use crate::utils::format_flags;
use crate::widgets::panels::{DISK_TABLE_CHROME, LABEL_WIDTH};
use crate::widgets::{cpu_panel, disk_table, memory_panel, uptime_panel};

/// CPU rows other than the flags line
const CPU_FIXED_ROWS: u16 = 7;
const MEMORY_ROWS: u16 = 5;
const BORDERS: u16 = 2;
const UPTIME_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 1;

/// Owns the display surface. Each [`Renderer::render`] is one paint:
/// ratatui draws into a back buffer and flushes only the diff.
pub struct Renderer<B: Backend> {
    terminal: Terminal<B>,
}

impl<B: Backend> Renderer<B> {
    pub fn new(mut terminal: Terminal<B>) -> io::Result<Self> {
        terminal.clear()?;
        Ok(Self { terminal })
    }

    pub fn render(&mut self, snapshot: &MetricsSnapshot) -> io::Result<()> {
        self.terminal.draw(|frame| draw(frame, snapshot))?;
        Ok(())
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

/// Lines the flags value needs at the given panel width
fn flag_lines(snapshot: &MetricsSnapshot, width: u16) -> u16 {
    let value_width = usize::from(width.saturating_sub(BORDERS)).saturating_sub(LABEL_WIDTH + 2);
    if value_width == 0 {
        return 1;
    }
    let len = format_flags(&snapshot.cpu.flags).chars().count();
    u16::try_from(len.div_ceil(value_width).max(1)).unwrap_or(u16::MAX)
}

/// Heights of the CPU and disk panels. On a short screen the CPU panel is
/// cut from the bottom (flags first) so every partition row stays visible.
fn panel_heights(snapshot: &MetricsSnapshot, area: Rect) -> (u16, u16) {
    let disk_rows = u16::try_from(snapshot.disks.len()).unwrap_or(u16::MAX);
    let disk_height = DISK_TABLE_CHROME.saturating_add(disk_rows);

    let cpu_wanted = CPU_FIXED_ROWS + flag_lines(snapshot, area.width) + BORDERS;
    let spare = area
        .height
        .saturating_sub(MEMORY_ROWS + BORDERS + UPTIME_HEIGHT + FOOTER_HEIGHT)
        .saturating_sub(disk_height);
    // keep at least the brand line
    let cpu_height = cpu_wanted.min(spare).max(BORDERS + 1);

    (cpu_height, disk_height)
}

fn draw(frame: &mut Frame, snapshot: &MetricsSnapshot) {
    let area = frame.size();
    let (cpu_height, disk_height) = panel_heights(snapshot, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(cpu_height),            // CPU
            Constraint::Length(MEMORY_ROWS + BORDERS), // Memory
            Constraint::Min(disk_height),              // Disks
            Constraint::Length(UPTIME_HEIGHT),         // Uptime
            Constraint::Length(FOOTER_HEIGHT),         // Footer
        ])
        .split(area);

    frame.render_widget(cpu_panel(&snapshot.cpu), chunks[0]);
    frame.render_widget(memory_panel(&snapshot.memory), chunks[1]);
    frame.render_widget(disk_table(&snapshot.disks), chunks[2]);
    frame.render_widget(uptime_panel(&snapshot.uptime), chunks[3]);
    render_footer(frame, chunks[4]);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new("[q] Quit")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CpuFrequency, CpuInfo, DiskInfo, MemoryInfo, UptimeInfo};
    use crate::widgets::panels::{CPU_TITLE, DISK_TITLE, MEMORY_TITLE, UPTIME_TITLE};
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;

    fn snapshot() -> MetricsSnapshot {
        MetricsSnapshot {
            cpu: CpuInfo {
                brand: "Test CPU @ 3.00GHz".to_string(),
                architecture: "x86_64".to_string(),
                bits: 64,
                physical_cores: Some(4),
                logical_threads: 8,
                frequency: None,
                flags: (0..20).map(|i| format!("flag{}", i)).collect(),
            },
            memory: MemoryInfo {
                total: 17179869184,
                used: 8589934592,
                available: 8589934592,
                percent: 50.0,
                swap_total: 0,
                swap_used: 0,
                swap_percent: 0.0,
            },
            disks: vec![DiskInfo {
                device: "/dev/sda1".to_string(),
                mount_point: PathBuf::from("/"),
                fs_type: "ext4".to_string(),
                total: 107374182400,
                used: 53687091200,
                free: 53687091200,
                percent: 50.0,
            }],
            uptime: UptimeInfo { seconds: 3725 },
        }
    }

    fn screen_text(renderer: &Renderer<TestBackend>) -> String {
        let buffer = renderer.terminal().backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    fn render(snapshot: &MetricsSnapshot, width: u16, height: u16) -> String {
        let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut renderer = Renderer::new(terminal).unwrap();
        renderer.render(snapshot).unwrap();
        screen_text(&renderer)
    }

    #[test]
    fn test_all_panels_present() {
        let text = render(&snapshot(), 140, 45);
        for title in [CPU_TITLE, MEMORY_TITLE, DISK_TITLE, UPTIME_TITLE] {
            assert!(text.contains(title), "missing panel {title}");
        }
        assert!(text.contains("[q] Quit"));
    }

    #[test]
    fn test_all_panels_present_without_disks() {
        let mut snap = snapshot();
        snap.disks.clear();
        let text = render(&snap, 140, 45);
        for title in [CPU_TITLE, MEMORY_TITLE, DISK_TITLE, UPTIME_TITLE] {
            assert!(text.contains(title), "missing panel {title}");
        }
    }

    #[test]
    fn test_missing_frequency_shows_na() {
        let text = render(&snapshot(), 140, 45);
        assert!(text.contains("Max Frequency: N/A"));
        assert!(text.contains("Current Frequency: N/A"));
    }

    #[test]
    fn test_frequency_is_shown() {
        let mut snap = snapshot();
        snap.cpu.frequency = Some(CpuFrequency {
            current_mhz: 3000.0,
            max_mhz: 4500.0,
        });
        let text = render(&snap, 140, 45);
        assert!(text.contains("Max Frequency: 4500.00 MHz"));
        assert!(text.contains("Current Frequency: 3000.00 MHz"));
    }

    #[test]
    fn test_memory_and_uptime_values() {
        let text = render(&snapshot(), 140, 45);
        assert!(text.contains("Used RAM: 8.00 GB (50.0%)"));
        assert!(text.contains("1:02:05"));
    }

    #[test]
    fn test_flags_truncated_on_screen_only() {
        let snap = snapshot();
        let text = render(&snap, 140, 45);
        assert!(text.contains("flag14, ..."));
        assert!(!text.contains("flag15"));
        assert_eq!(snap.cpu.flags.len(), 20);
    }

    #[test]
    fn test_one_row_per_disk() {
        let mut snap = snapshot();
        let text = render(&snap, 140, 45);
        assert_eq!(text.matches("/dev/sda1").count(), 1);

        snap.disks.push(DiskInfo {
            device: "/dev/nvme0n1p2".to_string(),
            mount_point: PathBuf::from("/home"),
            fs_type: "btrfs".to_string(),
            total: 10737418240,
            used: 1073741824,
            free: 9663676416,
            percent: 10.0,
        });
        let text = render(&snap, 140, 45);
        assert_eq!(text.matches("/dev/sda1").count(), 1);
        assert_eq!(text.matches("/dev/nvme0n1p2").count(), 1);
        assert!(text.contains("10.0%"));
    }

    #[test]
    fn test_rerender_replaces_previous_frame() {
        let terminal = Terminal::new(TestBackend::new(140, 45)).unwrap();
        let mut renderer = Renderer::new(terminal).unwrap();
        let mut snap = snapshot();
        renderer.render(&snap).unwrap();

        snap.uptime = UptimeInfo { seconds: 3726 };
        renderer.render(&snap).unwrap();
        let text = screen_text(&renderer);
        assert!(text.contains("1:02:06"));
        assert!(!text.contains("1:02:05"));
    }

    fn short_disk(device: &str, mount: &str) -> DiskInfo {
        DiskInfo {
            device: device.to_string(),
            mount_point: PathBuf::from(mount),
            fs_type: "ext4".to_string(),
            total: 10737418240,
            used: 5368709120,
            free: 5368709120,
            percent: 50.0,
        }
    }

    #[test]
    fn test_standard_terminal_shows_the_disk_row() {
        let snap = snapshot();
        let text = render(&snap, 80, 24);
        for title in [CPU_TITLE, MEMORY_TITLE, DISK_TITLE, UPTIME_TITLE] {
            assert!(text.contains(title), "missing panel {title}");
        }
        assert_eq!(text.matches("/dev/sda1").count(), 1);
        assert!(text.contains("1:02:05"));
    }

    #[test]
    fn test_standard_terminal_shows_every_disk_row() {
        let mut snap = snapshot();
        snap.disks.push(short_disk("/dev/sdb1", "/data"));
        snap.disks.push(short_disk("/dev/sdc1", "/backup"));
        let text = render(&snap, 80, 24);
        for device in ["/dev/sda1", "/dev/sdb1", "/dev/sdc1"] {
            assert_eq!(text.matches(device).count(), 1, "missing row for {device}");
        }
        assert!(text.contains(CPU_TITLE));
        assert!(text.contains(UPTIME_TITLE));
    }

    #[test]
    fn test_cpu_panel_gives_way_to_disk_rows() {
        let mut snap = snapshot();
        let area = Rect::new(0, 0, 80, 24);
        let (cpu, disks) = panel_heights(&snap, area);
        assert_eq!(disks, 4);
        assert_eq!(cpu + disks + MEMORY_ROWS + BORDERS + UPTIME_HEIGHT + FOOTER_HEIGHT, 24);

        snap.disks.push(short_disk("/dev/sdb1", "/data"));
        let (smaller, disks) = panel_heights(&snap, area);
        assert_eq!(disks, 5);
        assert_eq!(smaller, cpu - 1);

        // a tall screen gives the CPU panel everything it asks for
        let (cpu, _) = panel_heights(&snap, Rect::new(0, 0, 140, 45));
        assert_eq!(cpu, CPU_FIXED_ROWS + flag_lines(&snap, 140) + BORDERS);
    }

    #[test]
    fn test_flag_lines_grow_when_narrow() {
        let snap = snapshot();
        assert_eq!(flag_lines(&snap, 200), 1);
        assert!(flag_lines(&snap, 60) > 1);
        assert_eq!(flag_lines(&snap, 10), 1);
    }
}
