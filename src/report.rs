/// File name offered for the downloadable report.
pub const REPORT_FILE_NAME: &str = "Plant_Disease_Report.txt";

/// MIME type of the downloadable report.
pub const REPORT_MIME_TYPE: &str = "text/plain";

/// Formats the downloadable plain-text report. Pure string formatting; the
/// caller decides how to hand the bytes to the user.
pub fn build_report(label: &str, confidence: f32, cause: &str, prevention: &str) -> String {
    format!(
        "Plant Disease Detection Report\n\
         ---------------------------------\n\
         Prediction: {label}\n\
         Confidence: {confidence:.2}%\n\
         \n\
         Cause:\n\
         {cause}\n\
         \n\
         Prevention:\n\
         {prevention}\n\
         \n\
         Thank you for using the Plant Disease Detection System!\n"
    )
}
