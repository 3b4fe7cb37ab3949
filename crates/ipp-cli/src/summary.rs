use console::Style;
use ipp_core::observer::{Stage, TimingCollector};
use ipp_core::pipeline::JobConfig;
use ipp_core::strategy::{default_worker_count, StrategyKind};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_job_summary(config: &JobConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Pixel Kernel Job"));
    println!("  {}", s.title.apply_to("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}"));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Operation"),
        s.method.apply_to(&config.operation)
    );
    if let Some(ref reference) = config.reference {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Reference"),
            s.path.apply_to(reference.display())
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Inputs"),
        s.value.apply_to(config.inputs.len())
    );
    if let Some(ref dir) = config.output_dir {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Output dir"),
            s.path.apply_to(dir.display())
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Execution"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Strategy"),
        s.method.apply_to(config.execution.strategy)
    );
    if config.execution.strategy == StrategyKind::Chunked {
        let workers = config.execution.workers.unwrap_or_else(default_worker_count);
        println!(
            "    {:<12}{}",
            s.label.apply_to("Workers"),
            s.value.apply_to(workers)
        );
    }
    println!();
}

pub fn print_timings(timings: &TimingCollector) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Timings"));
    for stage in [Stage::Decode, Stage::Kernel, Stage::Encode] {
        println!(
            "    {:<16}{}",
            s.label.apply_to(stage),
            s.value.apply_to(format!("{:.3}s", timings.total_for(stage).as_secs_f64()))
        );
    }
    println!(
        "    {:<16}{}",
        s.label.apply_to("Total"),
        s.value.apply_to(format!("{:.3}s", timings.total().as_secs_f64()))
    );

    let bands = timings.bands();
    if !bands.is_empty() {
        let files = timings.files();
        println!();
        println!("  {}", s.header.apply_to("Bands"));
        for (i, band) in bands.iter().enumerate() {
            if i == 0 || bands[i - 1].file != band.file {
                let name = files
                    .get(band.file)
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| format!("file {}", band.file + 1));
                println!("    {}", s.path.apply_to(name));
            }
            println!(
                "      {:<14}{}",
                s.label.apply_to(format!("#{} rows {}..{}", band.band, band.rows.start, band.rows.end)),
                s.value.apply_to(format!("{:.3}s", band.elapsed.as_secs_f64()))
            );
        }
    }
    println!();
}
