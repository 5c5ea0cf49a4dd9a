use crate::models::system::format_uptime;
use crate::models::Snapshot;
use crate::renderer::colours::{Colours, Severity};
use crate::renderer::drawing;
use std::fmt::Write;

pub const FRAME_WIDTH: usize = 78;
const LABEL_WIDTH: usize = 8;
const NAME_WIDTH: usize = 12;
const NOT_AVAILABLE: &str = "N/A";

pub struct Style {
    pub bar_width: usize,
    pub colours: Colours,
    /// Shown under the header on every frame, e.g. an ignored interval.
    pub notice: Option<String>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            bar_width: 30,
            colours: Colours::default(),
            notice: None,
        }
    }
}

pub struct RenderContext<'a> {
    pub style: &'a Style,
    pub snapshot: &'a Snapshot,
    pub out: &'a mut String,
}

impl RenderContext<'_> {
    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn section(&mut self, title: &str, detail: &str) {
        let colours = &self.style.colours;
        let title = colours.paint(colours.section, &drawing::column(title, LABEL_WIDTH));
        self.line(format!("{} {}", title, detail).trim_end());
    }

    /// `[bar]  42.0%` coloured by the load band.
    fn load_bar(&self, percent: f32) -> String {
        let colours = &self.style.colours;
        let colour = colours.severity(Severity::for_load(percent));
        let bar = drawing::progress_bar(percent, self.style.bar_width);
        colours.paint(colour, &format!("{} {:>5.1}%", bar, percent))
    }

    fn temperature(&self, celsius: Option<f32>) -> String {
        let colours = &self.style.colours;
        match celsius {
            Some(t) => {
                let colour = colours.severity(Severity::for_temperature(t));
                colours.paint(colour, &format!("{:.1} °C", t))
            }
            None => colours.paint(colours.muted, NOT_AVAILABLE),
        }
    }
}

fn label(name: &str) -> String {
    format!("  {}", drawing::column(name, LABEL_WIDTH - 2))
}

pub fn render_header(ctx: &mut RenderContext) {
    let snapshot = ctx.snapshot;
    let colours = &ctx.style.colours;
    let host = &snapshot.host;

    let mut title = format!("hwpulse | {}", host.hostname);
    if !host.os.is_empty() {
        let _ = write!(title, " | {}", host.os);
    }
    let _ = write!(
        title,
        " | up {} | {}",
        format_uptime(host.uptime_secs),
        snapshot.timestamp.format("%H:%M:%S")
    );
    let title = colours.paint(colours.header, &title);

    let board = host.motherboard.as_deref().unwrap_or(NOT_AVAILABLE);
    let addresses = format!(
        "Local IP: {} | External IP: {} | Board: {}",
        host.local_ip, host.external_ip, board
    );
    let separator = colours.paint(colours.muted, &drawing::horizontal_line(FRAME_WIDTH));
    let notice = ctx
        .style
        .notice
        .as_deref()
        .map(|notice| colours.paint(colours.muted, notice));

    ctx.line(&title);
    ctx.line(&addresses);
    if let Some(notice) = notice {
        ctx.line(&notice);
    }
    ctx.line(&separator);
}

pub fn render_cpu(ctx: &mut RenderContext) {
    let snapshot = ctx.snapshot;
    let cpu = &snapshot.cpu;

    ctx.section("CPU", &cpu.name);
    let load = format!("{} {}", label("Load"), ctx.load_bar(cpu.total_usage_percent));
    ctx.line(&load);
    let temp = format!("{} {}", label("Temp"), ctx.temperature(cpu.temperature_c));
    ctx.line(&temp);
    let tasks = format!(
        "{} {} processes, {} threads",
        label("Tasks"),
        cpu.process_count,
        cpu.thread_count
    );
    ctx.line(&tasks);
}

pub fn render_memory(ctx: &mut RenderContext) {
    let snapshot = ctx.snapshot;
    let memory = &snapshot.memory;

    ctx.section("MEMORY", "");
    let used = format!(
        "{} {}  {:.0} / {:.0} MB",
        label("Used"),
        ctx.load_bar(memory.percent_used),
        memory.used_mb,
        memory.total_mb
    );
    ctx.line(&used);
}

pub fn render_disks(ctx: &mut RenderContext) {
    let snapshot = ctx.snapshot;
    let disks = &snapshot.disks;

    ctx.section("DISKS", "");
    if disks.is_empty() {
        let muted = ctx.style.colours.paint(ctx.style.colours.muted, "No drives found");
        ctx.line(&format!("  {}", muted));
        return;
    }
    for disk in disks {
        let usage = format!(
            "  {} {}",
            drawing::column(&disk.name, NAME_WIDTH),
            ctx.load_bar(disk.percent_used)
        );
        ctx.line(&usage);
        let detail = format!(
            "  {} {:.1} GB free of {:.1} GB | R {:.2} MB/s | W {:.2} MB/s",
            drawing::column("", NAME_WIDTH),
            disk.free_gb,
            disk.total_gb,
            disk.read_mbps,
            disk.write_mbps
        );
        ctx.line(&detail);
    }
}

pub fn render_networks(ctx: &mut RenderContext) {
    let snapshot = ctx.snapshot;
    let networks = &snapshot.networks;

    ctx.section("NETWORK", "");
    if networks.is_empty() {
        let muted = ctx
            .style
            .colours
            .paint(ctx.style.colours.muted, "No active network interfaces");
        ctx.line(&format!("  {}", muted));
        return;
    }
    for net in networks {
        let line = format!(
            "  {} ↓ {:>8.2} Mbps  ↑ {:>8.2} Mbps | total ↓ {:.2} GB ↑ {:.2} GB",
            drawing::column(&net.name, NAME_WIDTH),
            net.download_mbps,
            net.upload_mbps,
            net.total_down_gb,
            net.total_up_gb
        );
        ctx.line(&line);
    }
}

pub fn render_gpu(ctx: &mut RenderContext) {
    let snapshot = ctx.snapshot;
    let Some(gpu) = &snapshot.gpu else {
        let muted = ctx
            .style
            .colours
            .paint(ctx.style.colours.muted, "No dedicated GPU detected");
        ctx.section("GPU", &muted);
        return;
    };

    ctx.section("GPU", &gpu.name);
    let load = format!("{} {}", label("Load"), ctx.load_bar(gpu.core_load));
    ctx.line(&load);
    let temp = format!("{} {}", label("Temp"), ctx.temperature(Some(gpu.core_temp)));
    ctx.line(&temp);
    let clocks = format!(
        "{} core {:.0} MHz, memory {:.0} MHz",
        label("Clock"),
        gpu.core_clock_mhz,
        gpu.mem_clock_mhz
    );
    ctx.line(&clocks);
    let vram = format!(
        "{} {}  {:.0} / {:.0} MB",
        label("VRAM"),
        ctx.load_bar(gpu.vram_percent_used),
        gpu.vram_used_mb,
        gpu.vram_total_mb
    );
    ctx.line(&vram);
}
