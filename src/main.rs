//! Decorr: Feature Pre-filtering CLI Tool
//!
//! Drops zero-variance, target-irrelevant and redundant numeric features
//! using pairwise correlation.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use decorr::cli::{confirm_drop_features, Cli, TieBreakArg};
use decorr::pipeline::{
    analyze_redundancy, analyze_relevance, estimated_memory_mb, load_dataset, prepare_features,
    save_dataset, RedundancyAnalysis, RelevanceAnalysis, TieBreak, TieBreakKind,
};
use decorr::report::{
    export_redundancy, export_relevance, DirectorySink, HeatmapRenderer, ReductionReport,
    ReductionReportBuilder, ReductionSummary, ReportBuilderParams, ReportSink, SvgHeatmap,
    TerminalHeatmap,
};
use decorr::utils::{
    create_spinner, finish_with_error, finish_with_success, print_banner, print_completion,
    print_config, print_count, print_feature_list, print_info, print_step_header,
    print_step_time, print_success, print_warning, ConfigCard,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.validate().map_err(anyhow::Error::msg)?;

    let output_path = cli.output_path();
    let tie_break = cli.tie_break();
    let tie_break_label = match tie_break {
        TieBreakArg::Target => "target",
        TieBreakArg::Mean => "mean",
    };
    let options = cli.method.options(cli.parallel);

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&ConfigCard {
        input: &cli.input,
        target: cli.target.as_deref(),
        output: &output_path,
        method: options.method_name(),
        relevance_threshold: cli.relevance_threshold,
        correlation_threshold: cli.correlation_threshold,
        tie_break: tie_break_label,
    });

    // Load dataset
    let step_start = Instant::now();
    let mut df = with_spinner("Loading dataset...", "Dataset loaded", || {
        load_dataset(&cli.input, cli.infer_schema_length)
    })?;

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", df.height());
    println!("      Columns: {}", df.width());
    println!("      Estimated memory: {:.2} MB", estimated_memory_mb(&df));

    let prepared = prepare_features(&df, cli.target.as_deref(), &cli.drop_columns)?;
    if !prepared.skipped.is_empty() {
        print_info(&format!(
            "Skipping {} non-numeric column(s) (kept in output):",
            prepared.skipped.len()
        ));
        print_feature_list(&prepared.skipped);
    }
    let mut table = prepared.table;
    let target = prepared.target;

    let mut summary = ReductionSummary::new(table.n_features());
    let mut report = ReductionReportBuilder::new(ReportBuilderParams {
        input_file: cli.input.display().to_string(),
        output_file: output_path.display().to_string(),
        target_column: cli.target.clone(),
        method: options.method_name().to_string(),
        tie_break: match tie_break {
            TieBreakArg::Target => TieBreakKind::Target,
            TieBreakArg::Mean => TieBreakKind::Mean,
        },
        relevance_threshold: cli.relevance_threshold,
        redundancy_threshold: cli.correlation_threshold,
    });
    report.set_features(table.names());
    let load_elapsed = step_start.elapsed();
    summary.set_load_time(load_elapsed);
    print_step_time(load_elapsed);

    // Step 1: Constant columns make every correlation undefined, so they go first
    print_step_header(1, "Zero-Variance Screen");

    let constant = table.constant_features();
    if constant.is_empty() {
        print_info("No constant features found");
    } else {
        print_count(
            "constant feature(s)",
            constant.len(),
            Some("(correlation undefined)"),
        );
        print_feature_list(&constant);
        table = table.without(&constant);
        report.set_constant_drops(&constant);
        summary.add_constant_drops(constant);
        print_success("Dropped constant features");
    }

    // Step 2: Target relevance
    print_step_header(2, "Target Relevance");

    let step_start = Instant::now();
    let mut relevance: Option<RelevanceAnalysis> = None;
    match (cli.relevance_threshold, target.as_deref()) {
        (Some(_), Some(_)) if table.is_empty() => print_info("No features left to analyze"),
        (Some(threshold), Some(target)) => {
            let analysis = with_spinner(
                "Correlating features with target...",
                "Relevance analysis complete",
                || {
                    analyze_relevance(&table, target, threshold, &options)
                        .context("Relevance analysis failed")
                },
            )?;

            let mut applied = false;
            if analysis.dropped.is_empty() {
                print_info("No features below the relevance threshold");
            } else {
                print_count(
                    "weakly relevant feature(s)",
                    analysis.dropped.len(),
                    Some(&format!("(|r| < {:.3})", threshold)),
                );
                print_feature_list(&analysis.dropped);
                print_warning(
                    "Low linear correlation can hide non-linear relevance. \
                     Inspect these features against the target before relying on the drop.",
                );

                applied =
                    confirm_drop_features(&analysis.dropped, "target relevance", cli.no_confirm)?;
                if applied {
                    table = table.without(&analysis.dropped);
                    summary.add_relevance_drops(analysis.dropped.clone());
                    print_success("Dropped weakly relevant features");
                } else {
                    print_info("Kept all features");
                }
            }

            report.set_relevance_results(&analysis, applied);
            relevance = Some(analysis);
        }
        _ => print_info("Skipped (no --relevance-threshold given)"),
    }
    let relevance_elapsed = step_start.elapsed();
    summary.set_relevance_time(relevance_elapsed);
    print_step_time(relevance_elapsed);

    // Step 3: Pairwise redundancy
    print_step_header(3, "Pairwise Redundancy");

    let step_start = Instant::now();
    let mut redundancy: Option<RedundancyAnalysis> = None;
    if table.n_features() < 2 {
        print_info("Fewer than two features left; nothing to compare");
    } else {
        let tie = match (tie_break, target.as_deref()) {
            (TieBreakArg::Target, Some(target)) => TieBreak::TargetCorrelation(target),
            _ => TieBreak::MeanCorrelation,
        };
        let analysis = with_spinner(
            &format!("Computing {}x{} correlation matrix...", table.n_features(), table.n_features()),
            "Redundancy analysis complete",
            || {
                analyze_redundancy(&table, tie, cli.correlation_threshold, &options)
                    .context("Redundancy analysis failed")
            },
        )?;

        if analysis.pairs.is_empty() {
            print_info("No redundant feature pairs found");
        } else {
            print_count(
                "redundant pair(s)",
                analysis.pairs.len(),
                Some(&format!("(|r| >= {:.2})", cli.correlation_threshold)),
            );
            for pair in &analysis.pairs {
                println!(
                    "        {} {} {} {} {}",
                    style("•").dim(),
                    style(&pair.dropped).red(),
                    style("~").dim(),
                    pair.kept,
                    style(format!("(r = {:.3})", pair.correlation)).dim()
                );
            }
        }

        if cli.plot {
            if let Err(e) = TerminalHeatmap::default().render(
                "Feature correlation",
                &analysis.matrix,
                &analysis.dropped,
            ) {
                print_warning(&format!("Heatmap rendering failed: {:#}", e));
            }
        }

        let applied =
            confirm_drop_features(&analysis.dropped, "pairwise redundancy", cli.no_confirm)?;
        if applied && !analysis.dropped.is_empty() {
            summary.add_redundancy_drops(analysis.dropped.clone());
            print_success("Dropped redundant features");
        }

        report.set_redundancy_results(&analysis, applied);
        redundancy = Some(analysis);
    }
    let redundancy_elapsed = step_start.elapsed();
    summary.set_redundancy_time(redundancy_elapsed);
    print_step_time(redundancy_elapsed);

    // Step 4: Save output
    print_step_header(4, "Save Results");

    let step_start = Instant::now();
    let mut removed = cli.drop_columns.clone();
    removed.extend(summary.all_dropped());
    df = df.drop_many(removed.iter().map(String::as_str));
    with_spinner(
        "Writing output file...",
        &format!("Saved to {}", output_path.display()),
        || save_dataset(&mut df, &output_path),
    )?;
    let save_elapsed = step_start.elapsed();
    summary.set_save_time(save_elapsed);
    print_step_time(save_elapsed);

    // Export failures never affect the saved dataset
    if cli.report {
        report.set_timing(&summary);
        let built = report.build();
        match export_report(&cli, &built, relevance.as_ref(), redundancy.as_ref()) {
            Ok(dir) => print_success(&format!("Report written to {}", dir.display())),
            Err(e) => print_warning(&format!("Report export failed: {:#}", e)),
        }
    }

    summary.display();
    print_completion();

    Ok(())
}

/// Run `work` behind a spinner, finishing it according to the outcome.
fn with_spinner<T>(message: &str, done: &str, work: impl FnOnce() -> Result<T>) -> Result<T> {
    let spinner = create_spinner(message);
    let result = work();
    match &result {
        Ok(_) => finish_with_success(&spinner, done),
        Err(_) => finish_with_error(&spinner, message.trim_end_matches('.')),
    }
    result
}

/// Write every analysis and the JSON report into the report directory.
fn export_report(
    cli: &Cli,
    report: &ReductionReport,
    relevance: Option<&RelevanceAnalysis>,
    redundancy: Option<&RedundancyAnalysis>,
) -> Result<PathBuf> {
    let mut sink = match &cli.report_dir {
        Some(dir) => DirectorySink::new(dir.clone())?,
        None => DirectorySink::timestamped(cli.input_dir())?,
    };

    if let Some(analysis) = relevance {
        export_relevance(&mut sink, analysis)?;
    }
    if let Some(analysis) = redundancy {
        export_redundancy(&mut sink, analysis)?;
        if cli.plot {
            SvgHeatmap::new(sink.path_for("redundancy_heatmap.svg")).render(
                "Feature correlation",
                &analysis.matrix,
                &analysis.dropped,
            )?;
        }
    }
    sink.write_report(report)?;

    Ok(sink.dir().to_path_buf())
}
