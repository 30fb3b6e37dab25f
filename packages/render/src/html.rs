//! Self-contained Leaflet page for a [`MapView`].
//!
//! The page embeds the view as JSON and draws it client-side, so pan, zoom
//! and hover need no server round-trip. When [`PageControls`] are given,
//! the page also carries the diagnosis/gender/metric selectors as a plain
//! `GET` form that reloads the page with the new selection.

use health_map_analytics_models::SelectorOptions;
use health_map_patient_models::{Metric, Selector};

use crate::MapView;

const LEAFLET_VERSION: &str = "1.9.4";

const TILE_URL: &str = "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png";

const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors &copy; CARTO";

const EMPTY_MESSAGE: &str = "No hay datos que coincidan con la selección.";

/// Selector state for the form above the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    /// Form submission target, e.g. `/map`.
    pub action: String,
    /// Available diagnosis and gender values.
    pub options: SelectorOptions,
    /// Current diagnosis selection.
    pub diagnosis: Selector,
    /// Current gender selection.
    pub gender: Selector,
    /// Current metric selection.
    pub metric: Metric,
}

/// Escapes text for an HTML text or attribute context.
#[must_use]
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

fn select(name: &str, label: &str, options: &[(String, String)], selected: &str) -> String {
    let mut html = format!(
        "<label>{}<select name=\"{}\">",
        escape(label),
        escape(name)
    );
    for (value, text) in options {
        let marker = if value == selected { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{}\"{marker}>{}</option>",
            escape(value),
            escape(text)
        ));
    }
    html.push_str("</select></label>");
    html
}

fn selector_options(values: &[String]) -> Vec<(String, String)> {
    std::iter::once((String::new(), Selector::ALL_LABEL.to_string()))
        .chain(values.iter().map(|v| (v.clone(), v.clone())))
        .collect()
}

fn selected_value(selector: &Selector) -> &str {
    match selector {
        Selector::All => "",
        Selector::Only(value) => value,
    }
}

fn controls_form(controls: &PageControls) -> String {
    let metrics: Vec<(String, String)> = Metric::all()
        .iter()
        .map(|m| (m.to_string(), m.label().to_string()))
        .collect();

    format!(
        "<form class=\"controls\" method=\"get\" action=\"{}\">{}{}{}<button type=\"submit\">Actualizar</button></form>",
        escape(&controls.action),
        select(
            "diagnosis",
            "Seleccionar diagnóstico",
            &selector_options(&controls.options.diagnoses),
            selected_value(&controls.diagnosis),
        ),
        select(
            "gender",
            "Filtrar por género",
            &selector_options(&controls.options.genders),
            selected_value(&controls.gender),
        ),
        select(
            "metric",
            "Métrica para colorear",
            &metrics,
            &controls.metric.to_string(),
        ),
    )
}

/// Serializes the view for embedding inside a `<script>` element.
fn script_json(view: &MapView) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(view)?.replace("</", "<\\/"))
}

/// Renders the full HTML page for `view`.
///
/// # Errors
///
/// Returns an error if the view cannot be serialized to JSON.
pub fn page(view: &MapView, controls: Option<&PageControls>) -> Result<String, serde_json::Error> {
    let data = script_json(view)?;
    let form = controls.map(controls_form).unwrap_or_default();
    let notice = if view.empty {
        format!("<p class=\"notice\">{}</p>", escape(EMPTY_MESSAGE))
    } else {
        String::new()
    };

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.js"></script>
<style>
body {{ font-family: sans-serif; margin: 1rem; }}
#map {{ width: 900px; height: 600px; }}
.controls label {{ margin-right: 1rem; }}
.controls select {{ margin-left: 0.5rem; }}
.notice {{ color: #a50f15; }}
.legend {{ background: white; padding: 0.5rem; line-height: 1.4; }}
.legend i {{ display: inline-block; width: 1rem; height: 1rem; margin-right: 0.5rem; vertical-align: middle; }}
</style>
</head>
<body>
<h3>{title}</h3>
{form}
{notice}
<div id="map"></div>
<script>
const view = {data};
const map = L.map("map").setView(view.center, view.zoom);
L.tileLayer("{TILE_URL}", {{ attribution: "{TILE_ATTRIBUTION}", subdomains: "abcd", maxZoom: 19 }}).addTo(map);
L.geoJSON(view.choropleth, {{ style: (f) => f.properties.style }}).addTo(map);
L.geoJSON(view.tooltips, {{
  style: (f) => f.properties.style,
  onEachFeature: (f, layer) => {{
    const table = document.createElement("table");
    for (const [label, value] of f.properties.tooltip) {{
      const row = table.insertRow();
      row.insertCell().textContent = label;
      row.insertCell().textContent = value;
    }}
    layer.bindTooltip(table, {{ sticky: true }});
  }},
}}).addTo(map);
const legend = L.control({{ position: "bottomright" }});
legend.onAdd = () => {{
  const div = L.DomUtil.create("div", "legend");
  const scale = view.legend.scale;
  const heading = document.createElement("strong");
  heading.textContent = view.legend.title;
  div.appendChild(heading);
  scale.colors.forEach((color, i) => {{
    if (scale.thresholds.length === 0) return;
    const row = document.createElement("div");
    const swatch = document.createElement("i");
    swatch.style.background = color;
    row.appendChild(swatch);
    const upper = i + 1 < scale.thresholds.length ? scale.thresholds[i + 1] : scale.max;
    row.appendChild(document.createTextNode(scale.thresholds[i].toFixed(1) + " - " + upper.toFixed(1)));
    div.appendChild(row);
  }});
  const none = document.createElement("div");
  const swatch = document.createElement("i");
  swatch.style.background = scale.noDataColor;
  none.appendChild(swatch);
  none.appendChild(document.createTextNode("Sin datos"));
  div.appendChild(none);
  return div;
}};
legend.addTo(map);
</script>
</body>
</html>
"#,
        title = escape(&view.title),
    ))
}
