use tracing::debug;

use crate::{
    errors::ReportError,
    report::model::{FailureDetail, ResolvedAttachment, StepDetail, Summary},
};

use super::{
    attachment::AttachmentResolver,
    record::{AttachmentRef, Status, TestRecord},
};

#[derive(Debug, Default)]
pub struct Aggregation {
    pub summary: Summary,
    pub fail_details: Vec<FailureDetail>,
}

fn resolve_all(
    attachments: &[AttachmentRef],
    resolver: &AttachmentResolver,
) -> Result<Vec<ResolvedAttachment>, ReportError> {
    attachments
        .iter()
        .map(|attachment| resolver.resolve(attachment))
        .collect()
}

fn failure_detail(
    record: &TestRecord,
    resolver: &AttachmentResolver,
) -> Result<FailureDetail, ReportError> {
    let details = record.status_details.clone().unwrap_or_default();
    let attachments = resolve_all(&record.attachments, resolver)?;
    let steps = record
        .steps
        .iter()
        .map(|step| {
            Ok(StepDetail {
                name: step.name.clone(),
                status: step.status.clone(),
                attachments: resolve_all(&step.attachments, resolver)?,
            })
        })
        .collect::<Result<Vec<_>, ReportError>>()?;

    Ok(FailureDetail {
        name: record.name.clone(),
        nodeid: record.full_name.clone().unwrap_or_default(),
        status: record.status.clone(),
        error_message: details.message.unwrap_or_default(),
        traceback: details.trace.unwrap_or_default(),
        attachments,
        labels: record.labels.clone(),
        steps,
    })
}

/// Count records per status and collect failure details for failed and
/// broken ones. Any attachment that cannot be resolved aborts the whole
/// aggregation.
pub fn aggregate(
    records: &[TestRecord],
    resolver: &AttachmentResolver,
) -> Result<Aggregation, ReportError> {
    let mut aggregation = Aggregation {
        summary: Summary {
            total: records.len(),
            ..Summary::default()
        },
        fail_details: vec![],
    };

    for record in records {
        let summary = &mut aggregation.summary;
        match &record.status {
            Status::Passed => summary.passed += 1,
            Status::Failed => summary.failed += 1,
            Status::Skipped => summary.skipped += 1,
            Status::Broken => summary.broken += 1,
            Status::Unknown(status) => {
                debug!(test = %record.name, status = %status, "unrecognized status, counted in total only");
            }
        }
        if record.status.is_failure() {
            aggregation
                .fail_details
                .push(failure_detail(record, resolver)?);
        }
    }

    Ok(aggregation)
}
