// templates/layouts/email.rs
use maud::{html, Markup, PreEscaped, DOCTYPE};

// Mail clients ignore external stylesheets, so everything is inlined.
const STYLES: &str = r#"
body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 1200px; margin: 0 auto; padding: 20px; background-color: #f5f5f5; }
.header { background: linear-gradient(135deg, #2c2c2c 0%, #1a1a1a 100%); color: white; padding: 30px; border-radius: 10px; margin-bottom: 30px; text-align: center; }
.header h1 { margin: 0 0 10px 0; font-size: 28px; }
.header p { margin: 5px 0; font-size: 16px; opacity: 0.9; }
.property-card { background: white; margin-bottom: 30px; border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); overflow: hidden; }
.property-header { background: #404040; color: white; padding: 20px; }
.property-header h3 { margin: 0 0 10px 0; font-size: 20px; }
.property-header .address { font-size: 16px; opacity: 0.9; }
.property-header .schedule { font-size: 14px; opacity: 0.8; margin-top: 5px; }
.property-details { padding: 25px; }
.details-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(250px, 1fr)); gap: 20px; }
.detail-section { background: #f8f8f8; padding: 15px; border-radius: 8px; border-left: 3px solid #666; }
.detail-section h4 { margin: 0 0 15px 0; color: #333; font-size: 16px; border-bottom: 1px solid #ddd; padding-bottom: 8px; }
.detail-row { display: flex; justify-content: space-between; margin-bottom: 8px; padding: 5px 0; }
.detail-label { font-weight: 600; color: #555; flex: 1; }
.detail-value { flex: 1; text-align: right; color: #333; }
.muted { color: #999; font-style: italic; }
.view-link { display: inline-block; background: #333; color: white; padding: 10px 20px; text-decoration: none; border-radius: 5px; margin-top: 15px; font-weight: 600; }
.footer { background: #1a1a1a; color: white; padding: 20px; text-align: center; border-radius: 10px; margin-top: 30px; }
"#;

pub fn email_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(STYLES)) }
            }
            body {
                (content)
                div class="footer" {
                    p { "Summit County Property Data Email Report" }
                    p { "This report contains the most recent property modifications in Summit County, Colorado" }
                }
            }
        }
    }
}
