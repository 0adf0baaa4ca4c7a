//! Server-rendered HTML for the single-screen churn form.

use std::fmt::Write;

use crate::classifier::ClassifierInfo;
use crate::encoding::{encoding_table, Category, Contract, Gender, PaymentMethod, YesNo};
use crate::form::{
    AmountField, RawSelections, SliderField, CONTRACT_LABEL, FAMILY_MEMBERS, GENDER_LABEL,
    MONTHLY_CHARGES, PAPERLESS_BILLING_LABEL, PAYMENT_METHOD_LABEL, SENIOR_CITIZEN_LABEL, TENURE,
    TOTAL_CHARGES, TOTAL_SERVICES_USED,
};
use crate::risk::{PredictionResult, RiskTier, CHURN_THRESHOLD};

const TITLE: &str = "Customer Churn Prediction (XGBoost)";

const STYLE: &str = "\
body{font-family:sans-serif;margin:0;display:flex;color:#262730}\
aside{width:18rem;padding:1.5rem;background:#f0f2f6;min-height:100vh;font-size:.9rem}\
main{flex:1;padding:1.5rem 3rem;max-width:48rem}\
label{display:block;margin-top:1rem;font-weight:600}\
fieldset{border:0;padding:0;margin:0}\
.msg{padding:.8rem 1rem;border-radius:.4rem;margin:.8rem 0}\
.info{background:#e8f1fb}.low{background:#e6f4ea}.medium{background:#fff6e0}\
.high,.error{background:#fdecea}\
table{border-collapse:collapse}td,th{border:1px solid #ddd;padding:.3rem .6rem;text-align:left}\
footer{margin-top:2rem;color:#808495;font-size:.8rem}";

/// Everything the page shows for one request.
#[derive(Debug)]
pub struct PageView<'a> {
    pub selections: &'a RawSelections,
    pub result: Option<PredictionResult>,
    pub error: Option<String>,
    pub model: &'a ClassifierInfo,
}

impl<'a> PageView<'a> {
    /// The empty form, as first shown.
    pub fn form(selections: &'a RawSelections, model: &'a ClassifierInfo) -> Self {
        Self {
            selections,
            result: None,
            error: None,
            model,
        }
    }

    pub fn render(&self) -> String {
        let mut html = String::with_capacity(8 * 1024);
        let _ = write!(
            html,
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
             <title>{TITLE}</title><style>{STYLE}</style></head><body>"
        );
        render_sidebar(&mut html);
        let _ = write!(html, "<main><h1>&#x1F4A1; {TITLE}</h1>");
        render_form(&mut html, self.selections);
        if let Some(error) = &self.error {
            let _ = write!(html, "<div class=\"msg error\">{}</div>", escape(error));
        }
        if let Some(result) = &self.result {
            render_result(&mut html, result);
        }
        let _ = write!(html, "<footer>Model: {}", escape(&self.model.description));
        if let Some(sha) = &self.model.sha256 {
            let _ = write!(html, " &middot; sha256 {}", escape(&sha[..sha.len().min(12)]));
        }
        html.push_str("</footer></main></body></html>");
        html
    }
}

fn render_sidebar(html: &mut String) {
    html.push_str("<aside><h2>Info &amp; Encodings</h2>");
    html.push_str(
        "<p><b>What do predictions mean?</b></p><ul>\
         <li><b>0 = Stay (No churn)</b></li><li><b>1 = Churn (Will leave)</b></li></ul>",
    );
    let _ = write!(
        html,
        "<p><b>Probability</b>: model predicts probability of churn (0 to 1).<br>\
         If probability &ge; {CHURN_THRESHOLD} &rarr; model predicts <i>Churn</i> by default.</p>"
    );
    html.push_str(
        "<p><b>Action guide (example):</b></p><ul>\
         <li>&lt; 0.3 &rarr; Low risk</li>\
         <li>0.3&ndash;0.6 &rarr; Medium risk (send offer)</li>\
         <li>&ge; 0.6 &rarr; High risk (call / retention offer)</li></ul>",
    );
    html.push_str("<p><b>Feature encodings:</b></p><ul>");
    for category in [
        Category::Gender,
        Category::SeniorCitizen,
        Category::Contract,
        Category::PaperlessBilling,
        Category::PaymentMethod,
    ] {
        let _ = write!(
            html,
            "<li>{}: {}</li>",
            category.name(),
            escape(&category.mapping())
        );
    }
    html.push_str("</ul></aside>");
}

fn render_form(html: &mut String, s: &RawSelections) {
    html.push_str(
        "<form method=\"post\" action=\"/predict\"><h3>Enter customer details</h3>",
    );
    radio(html, GENDER_LABEL, "gender", &Gender::LABELS, &s.gender);
    select(html, SENIOR_CITIZEN_LABEL, "senior_citizen", &YesNo::LABELS, &s.senior_citizen);
    slider(html, &TENURE, "tenure", s.tenure);
    select(html, CONTRACT_LABEL, "contract", &Contract::LABELS, &s.contract);
    radio(html, PAPERLESS_BILLING_LABEL, "paperless_billing", &YesNo::LABELS, &s.paperless_billing);
    select(html, PAYMENT_METHOD_LABEL, "payment_method", &PaymentMethod::LABELS, &s.payment_method);
    amount(html, &MONTHLY_CHARGES, "monthly_charges", s.monthly_charges);
    amount(html, &TOTAL_CHARGES, "total_charges", s.total_charges);
    slider(html, &TOTAL_SERVICES_USED, "total_services_used", s.total_services_used);
    slider(html, &FAMILY_MEMBERS, "family_members", s.family_members);
    html.push_str("<p><button type=\"submit\">Predict churn</button></p></form>");
}

fn radio(html: &mut String, label: &str, name: &str, options: &[&str], current: &str) {
    let _ = write!(html, "<fieldset><label>{}</label>", escape(label));
    for option in options {
        let checked = if *option == current { " checked" } else { "" };
        let _ = write!(
            html,
            "<input type=\"radio\" name=\"{name}\" value=\"{v}\"{checked}> {v} ",
            v = escape(option)
        );
    }
    html.push_str("</fieldset>");
}

fn select(html: &mut String, label: &str, name: &str, options: &[&str], current: &str) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{}</label><select id=\"{name}\" name=\"{name}\">",
        escape(label)
    );
    for option in options {
        let selected = if *option == current { " selected" } else { "" };
        let _ = write!(
            html,
            "<option value=\"{v}\"{selected}>{v}</option>",
            v = escape(option)
        );
    }
    html.push_str("</select>");
}

fn slider(html: &mut String, field: &SliderField, name: &str, value: u32) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label>\
         <input type=\"range\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" \
         step=\"1\" value=\"{value}\" oninput=\"this.nextElementSibling.value=this.value\">\
         <output>{value}</output>",
        label = escape(field.label),
        min = field.min,
        max = field.max,
    );
}

fn amount(html: &mut String, field: &AmountField, name: &str, value: f64) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label>\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" \
         step=\"{step}\" value=\"{value}\">",
        label = escape(field.label),
        min = field.min,
        step = field.step,
    );
}

fn render_result(html: &mut String, result: &PredictionResult) {
    let presentation = result.present();
    let _ = write!(
        html,
        "<h3>Prediction: <b>{}</b></h3>\
         <div class=\"msg info\">Churn probability: <b>{:.2}</b> (threshold {:.2})</div>",
        presentation.label, result.probability, CHURN_THRESHOLD
    );
    let class = match presentation.tier {
        RiskTier::Low => "low",
        RiskTier::Medium => "medium",
        RiskTier::High => "high",
    };
    let _ = write!(
        html,
        "<div class=\"msg {}\">{}</div>",
        class,
        escape(&presentation.tier.message())
    );

    html.push_str(
        "<h4>Mappings used (for clarity):</h4><table><tr><th>Feature</th><th>Mapping</th></tr>",
    );
    for (feature, mapping) in encoding_table() {
        let _ = write!(html, "<tr><td>{}</td><td>{}</td></tr>", feature, escape(&mapping));
    }
    html.push_str("</table>");
}

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> ClassifierInfo {
        ClassifierInfo {
            model_path: None,
            backend: "test",
            description: "test model".into(),
            sha256: Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad".into()),
        }
    }

    #[test]
    fn test_form_has_every_input_with_defaults() {
        let selections = RawSelections::default();
        let info = info();
        let html = PageView::form(&selections, &info).render();

        for name in [
            "gender",
            "senior_citizen",
            "tenure",
            "contract",
            "paperless_billing",
            "payment_method",
            "monthly_charges",
            "total_charges",
            "total_services_used",
            "family_members",
        ] {
            assert!(html.contains(&format!("name=\"{name}\"")), "missing input {name}");
        }
        assert!(html.contains("value=\"Male\" checked"));
        assert!(html.contains("max=\"72\""));
        assert!(html.contains("Predict churn"));
        assert!(html.contains("sha256 ba7816bf8f01"));
        assert!(!html.contains("Prediction:"));
    }

    #[test]
    fn test_result_section() {
        let selections = RawSelections::default();
        let info = info();
        let view = PageView {
            result: Some(PredictionResult::from_probability(0.55)),
            ..PageView::form(&selections, &info)
        };
        let html = view.render();

        assert!(html.contains("Prediction: <b>CHURN (will leave)</b>"));
        assert!(html.contains("Churn probability: <b>0.55</b> (threshold 0.50)"));
        assert!(html.contains("Medium risk — consider offering a promotion or engagement email."));
        assert!(html.contains("<td>PaymentMethod</td>"));
        assert!(html.contains("2 = Bank transfer (auto)"));
    }

    #[test]
    fn test_error_is_escaped() {
        let selections = RawSelections::default();
        let info = info();
        let view = PageView {
            error: Some("<script>alert(1)</script>".into()),
            ..PageView::form(&selections, &info)
        };
        let html = view.render();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
    }
}
