#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use offerdoc::{
    AnalysisResults, BackendAdapter, BatchRunner, ChartImage, CompanyInfo, Component, Composer,
    CustomerInfo, DocumentContext, DocumentRequest, ExecutorImpl, FinancingOption,
    GeneratorConfig, InclusionOptions, PageMetrics, ProjectData, SyncExecutor, TextCatalog,
    ThemeRegistry,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;

/// A small solid-colour PNG
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([230, 140, 20]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode png");
    bytes
}

pub fn texts() -> TextCatalog {
    TextCatalog::from_iter(
        [
            ("cover.title", "Your solar offer"),
            ("cover.intro", "Thank you for your interest."),
            ("footer.page", "Page {page} of {total}"),
        ]
        .map(|(k, v)| (k.to_string(), v.to_string())),
    )
}

pub fn company() -> CompanyInfo {
    CompanyInfo {
        name: "Sunworks GmbH".into(),
        street: Some("Sunny Street 1".into()),
        city: Some("01234 Solar City".into()),
        phone: Some("+49 30 1234".into()),
        logo: Some(Arc::new(png_bytes(8, 4))),
        ..CompanyInfo::default()
    }
}

/// A request in which every standard block has data
pub fn full_request(recipient_id: &str) -> DocumentRequest {
    DocumentRequest {
        recipient_id: recipient_id.to_string(),
        project_data: Some(ProjectData {
            customer: CustomerInfo {
                salutation: Some("Ms".into()),
                name: Some("Anna Schmidt".into()),
                street: Some("Hauptstr. 1".into()),
                city: Some("12345 Berlin".into()),
                ..CustomerInfo::default()
            },
            project_name: Some("Roof south".into()),
            offer_number: Some("A-2024-001".into()),
            offer_date: Some("2024-05-01".into()),
            components: vec![
                Component {
                    kind: "module".into(),
                    name: "SunPower 400".into(),
                    manufacturer: Some("SunPower".into()),
                    quantity: Some(24.0),
                    specs: BTreeMap::from([("Power".to_string(), "400 Wp".to_string())]),
                },
                Component {
                    kind: "inverter".into(),
                    name: "Inverter X".into(),
                    manufacturer: Some("Invertix".into()),
                    quantity: Some(1.0),
                    specs: BTreeMap::new(),
                },
            ],
            total_price: Some(18500.0),
            financing_options: vec![FinancingOption {
                name: "Loan 10y".into(),
                monthly_rate: json!(172.5),
                term_months: json!(120),
                interest_rate_percent: json!(3.9),
                total_cost: json!(20700),
            }],
            charts: vec![ChartImage {
                title: "Monthly yield".into(),
                image: Arc::new(png_bytes(24, 12)),
                width: 480.0,
                height: 240.0,
                caption: Some("Yield per month".into()),
            }],
            cover_image: None,
        }),
        analysis_results: Some(AnalysisResults {
            system_power_kwp: Some(9.6),
            annual_yield_kwh: Some(9400.0),
            self_consumption_percent: Some(34.5),
            autarky_percent: Some(61.0),
            annual_savings: Some(1450.0),
            amortization_years: Some(12.7),
            co2_savings_kg_per_year: Some(3900.0),
        }),
        company: company(),
        theme: "classic".into(),
        language: Some("de".into()),
        inclusion_options: InclusionOptions::new(),
        texts: Some(texts()),
        page_metrics: None,
        created_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()),
    }
}

/// Fails validation: no text catalogue at all
pub fn fatal_request(recipient_id: &str) -> DocumentRequest {
    DocumentRequest {
        texts: None,
        ..full_request(recipient_id)
    }
}

pub fn context(request: DocumentRequest) -> Arc<DocumentContext> {
    DocumentContext::from_request(request, &ThemeRegistry::built_in(), PageMetrics::a4())
}

/// Uncompressed streams so content can be searched directly
pub fn test_config() -> GeneratorConfig {
    GeneratorConfig {
        concurrency_limit: 2,
        compress_streams: false,
        ..GeneratorConfig::default()
    }
}

pub fn runner() -> BatchRunner {
    BatchRunner::builder()
        .with_config(test_config())
        .build()
        .expect("runner")
}

pub fn sequential_runner() -> BatchRunner {
    BatchRunner::builder()
        .with_config(test_config())
        .with_executor(ExecutorImpl::Sync(SyncExecutor::new()))
        .build()
        .expect("runner")
}

pub fn composer() -> Composer {
    Composer::builder()
        .with_standard_blocks()
        .with_backend(BackendAdapter::detect(false))
        .build()
        .expect("composer")
}
