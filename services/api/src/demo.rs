use crate::infra::{
    InMemoryQualityStore, InMemoryReportStore, InMemoryUsageStore, StaticAdvisorGateway,
};
use aquaaid::advisor::{AdvisorService, ChatMessage, ChatRequest, MessageRole};
use aquaaid::engine::quality::{QualityService, QualityThresholds, WaterSample};
use aquaaid::engine::reports::{ReportService, ReportSubmission, ReportType};
use aquaaid::engine::usage::{
    Activity, CalculationRequest, SaveUsageRequest, UsageService, UsageServiceError,
};
use aquaaid::error::AppError;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the advisor chat portion of the demo.
    #[arg(long)]
    pub(crate) skip_advisor: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// pH of the sample (safe range 6.5-8.5)
    #[arg(long)]
    pub(crate) ph: f64,
    /// Temperature in degrees Celsius
    #[arg(long)]
    pub(crate) temperature: f64,
    /// Turbidity in NTU
    #[arg(long)]
    pub(crate) turbidity: f64,
    /// Conductivity in µS/cm
    #[arg(long)]
    pub(crate) conductivity: f64,
}

#[derive(Args, Debug)]
pub(crate) struct UsageActivityArgs {
    /// Activity key, e.g. shower, bath, washing_machine
    #[arg(long, value_parser = crate::infra::parse_activity)]
    pub(crate) activity: Activity,
    /// How long the activity ran, in minutes
    #[arg(long)]
    pub(crate) minutes: f64,
}

#[derive(Args, Debug)]
pub(crate) struct UsageMeterArgs {
    /// Meter reading at the start of the period, in units (m³)
    #[arg(long)]
    pub(crate) before: f64,
    /// Meter reading at the end of the period, in units (m³)
    #[arg(long)]
    pub(crate) after: f64,
}

#[derive(Args, Debug)]
pub(crate) struct UsageMonthlyArgs {
    /// Average daily consumption in liters
    #[arg(long)]
    pub(crate) daily_liters: f64,
}

#[derive(Args, Debug)]
pub(crate) struct UsageSummaryArgs {
    /// Path to a usage ledger CSV export (activity_type,usage_liters,duration_minutes)
    #[arg(long)]
    pub(crate) ledger: PathBuf,
}

pub(crate) fn run_quality_analysis(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        ph,
        temperature,
        turbidity,
        conductivity,
    } = args;

    let service = QualityService::new(
        Arc::new(InMemoryQualityStore::default()),
        QualityThresholds::standard(),
    );
    let sample = WaterSample {
        ph,
        temperature,
        turbidity,
        conductivity,
    };

    let analysis = match service.analyze(sample) {
        Ok(analysis) => analysis,
        Err(err) => {
            println!("Sample rejected: {}", err);
            return Ok(());
        }
    };

    println!(
        "Water quality: {} [{}]",
        analysis.verdict.status.label(),
        analysis.verdict.color_tag
    );
    println!("{}", analysis.verdict.message);
    Ok(())
}

pub(crate) fn run_usage_activity(args: UsageActivityArgs) -> Result<(), AppError> {
    let UsageActivityArgs { activity, minutes } = args;

    let service = UsageService::new(Arc::new(InMemoryUsageStore::default()));
    let request = CalculationRequest {
        activity: Some(activity),
        duration_minutes: Some(minutes),
        ..CalculationRequest::default()
    };

    let calculation = match service.calculate(&request) {
        Ok(calculation) => calculation,
        Err(err) => {
            println!("Calculation rejected: {}", err);
            return Ok(());
        }
    };

    let rate = activity.rate();
    println!(
        "{} for {} minutes: {} L ({} m³)",
        activity.label(),
        minutes,
        calculation.volume_liters,
        calculation.cubic_meters
    );
    println!("Rate applied: {} {}", rate.liters, rate.basis.unit_label());
    Ok(())
}

pub(crate) fn run_usage_meter(args: UsageMeterArgs) -> Result<(), AppError> {
    let UsageMeterArgs { before, after } = args;

    let service = UsageService::new(Arc::new(InMemoryUsageStore::default()));
    let request = CalculationRequest {
        meter_before: Some(before),
        meter_after: Some(after),
        ..CalculationRequest::default()
    };

    let calculation = match service.calculate(&request) {
        Ok(calculation) => calculation,
        Err(err) => {
            println!("Calculation rejected: {}", err);
            return Ok(());
        }
    };

    println!(
        "Meter delta: {} L ({} m³)",
        calculation.volume_liters, calculation.cubic_meters
    );
    if let Some(bill) = &calculation.bill {
        println!("{}", bill.summary_line());
    }
    Ok(())
}

pub(crate) fn run_usage_monthly(args: UsageMonthlyArgs) -> Result<(), AppError> {
    let UsageMonthlyArgs { daily_liters } = args;

    let service = UsageService::new(Arc::new(InMemoryUsageStore::default()));
    let request = CalculationRequest {
        daily_liters: Some(daily_liters),
        ..CalculationRequest::default()
    };

    let calculation = match service.calculate(&request) {
        Ok(calculation) => calculation,
        Err(err) => {
            println!("Calculation rejected: {}", err);
            return Ok(());
        }
    };

    println!(
        "Projected monthly use: {} L ({} m³) from {} L/day over 30 days",
        calculation.volume_liters, calculation.cubic_meters, daily_liters
    );
    Ok(())
}

pub(crate) fn run_usage_summary(args: UsageSummaryArgs) -> Result<(), AppError> {
    let UsageSummaryArgs { ledger } = args;

    let service = UsageService::new(Arc::new(InMemoryUsageStore::default()));
    let csv = std::fs::read_to_string(&ledger)?;

    let (summary, _source) = match service.summary(Some(&csv)) {
        Ok(result) => result,
        Err(UsageServiceError::Ledger(err)) => return Err(AppError::from(err)),
        Err(err) => {
            println!("Summary unavailable: {}", err);
            return Ok(());
        }
    };

    println!(
        "Ledger summary: {} records, {} L total ({} m³)",
        summary.record_count, summary.total_liters, summary.cubic_meters
    );
    for entry in &summary.by_activity {
        println!(
            "- {}: {} L across {} records",
            entry.activity_type, entry.total_liters, entry.record_count
        );
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { skip_advisor } = args;

    println!("Water metrics engine demo");

    println!("\nQuality classifier");
    let quality = QualityService::new(
        Arc::new(InMemoryQualityStore::default()),
        QualityThresholds::standard(),
    );
    let samples = [
        WaterSample {
            ph: 7.2,
            temperature: 24.0,
            turbidity: 1.8,
            conductivity: 420.0,
        },
        WaterSample {
            ph: 5.9,
            temperature: 31.5,
            turbidity: 6.2,
            conductivity: 1720.0,
        },
    ];
    for sample in samples {
        match quality.analyze(sample) {
            Ok(analysis) => println!(
                "- pH {}, {} NTU -> {} [{}]: {}",
                sample.ph,
                sample.turbidity,
                analysis.verdict.status.label(),
                analysis.verdict.color_tag,
                analysis.verdict.message
            ),
            Err(err) => println!("- sample rejected: {}", err),
        }
    }

    println!("\nUsage accountant");
    let usage = UsageService::new(Arc::new(InMemoryUsageStore::default()));

    let shower = CalculationRequest {
        activity: Some(Activity::Shower),
        duration_minutes: Some(10.0),
        ..CalculationRequest::default()
    };
    match usage.calculate(&shower) {
        Ok(calculation) => println!(
            "- 10 minute shower: {} L ({} m³)",
            calculation.volume_liters, calculation.cubic_meters
        ),
        Err(err) => println!("- shower calculation rejected: {}", err),
    }

    let meter = CalculationRequest {
        meter_before: Some(1040.0),
        meter_after: Some(1042.5),
        ..CalculationRequest::default()
    };
    match usage.calculate(&meter) {
        Ok(calculation) => {
            println!(
                "- meter delta 1040 -> 1042.5: {} L",
                calculation.volume_liters
            );
            if let Some(bill) = &calculation.bill {
                println!("  {}", bill.summary_line());
            }
        }
        Err(err) => println!("- meter calculation rejected: {}", err),
    }

    let saves = [
        SaveUsageRequest {
            usage_liters: Some(90.0),
            activity_type: Some("shower".to_string()),
            duration_minutes: Some(10),
        },
        SaveUsageRequest {
            usage_liters: Some(80.0),
            activity_type: Some("bath".to_string()),
            duration_minutes: None,
        },
        SaveUsageRequest {
            usage_liters: Some(2500.0),
            activity_type: None,
            duration_minutes: None,
        },
    ];
    for save in saves {
        match usage.save(save) {
            Ok(record) => println!(
                "- saved {} L as {}",
                record.usage_liters, record.activity_type
            ),
            Err(err) => println!("- record rejected: {}", err),
        }
    }

    match usage.summary(None) {
        Ok((summary, _source)) => {
            println!(
                "- stored usage: {} records, {} L total ({} m³)",
                summary.record_count, summary.total_liters, summary.cubic_meters
            );
            for entry in &summary.by_activity {
                println!(
                    "  - {}: {} L across {} records",
                    entry.activity_type, entry.total_liters, entry.record_count
                );
            }
        }
        Err(err) => println!("- summary unavailable: {}", err),
    }

    println!("\nIssue reports");
    let reports = ReportService::new(Arc::new(InMemoryReportStore::default()));
    let submissions = [
        ReportSubmission {
            report_type: ReportType::Leak,
            title: "Burst pipe along the market road".to_string(),
            description: "Water has been pooling since last night.".to_string(),
            location_name: Some("Riverside market".to_string()),
            latitude: Some(-1.2921),
            longitude: Some(36.8219),
        },
        ReportSubmission {
            report_type: ReportType::Contamination,
            title: "Brown water at the school tap".to_string(),
            description: "Students report a metallic taste since Monday.".to_string(),
            location_name: None,
            latitude: None,
            longitude: None,
        },
    ];
    for submission in submissions {
        match reports.submit(submission) {
            Ok(report) => println!(
                "- {} filed as {} [{}]",
                report.title,
                report.id.0,
                report.status.label()
            ),
            Err(err) => println!("- report rejected: {}", err),
        }
    }

    match reports.overview() {
        Ok(overview) => println!(
            "- overview: {} total ({} pending, {} in progress, {} resolved)",
            overview.total,
            overview.breakdown.pending,
            overview.breakdown.in_progress,
            overview.breakdown.resolved
        ),
        Err(err) => println!("- overview unavailable: {}", err),
    }

    if skip_advisor {
        return Ok(());
    }

    println!("\nAdvisor chat (canned gateway)");
    let gateway = Arc::new(StaticAdvisorGateway::new(
        "Fix visible leaks first; a dripping tap can waste over 30 liters a day.",
    ));
    let advisor = AdvisorService::new(gateway.clone());
    let request = ChatRequest {
        messages: vec![ChatMessage {
            role: MessageRole::User,
            content: "How do I bring my water bill down?".to_string(),
        }],
        previous_reading: Some(1040.0),
        current_reading: Some(1042.5),
    };

    match advisor.chat(request).await {
        Ok(response) => {
            for choice in &response.choices {
                println!("- assistant: {}", choice.message.content);
            }
        }
        Err(err) => println!("- advisor unavailable: {}", err),
    }

    let prompts = gateway.prompts();
    if let Some(prompt) = prompts.first() {
        if let Some(line) = prompt
            .system_instructions
            .lines()
            .find(|line| line.starts_with("Current calculation:"))
        {
            println!("  bill context forwarded: {}", line);
        }
    }

    Ok(())
}
