//! The single HTML page.
//!
//! A static shell: it fetches `/api/layout`, renders the controls and graph
//! slots, and posts the current filter values to `/api/update` whenever a
//! control changes. Responses older than the latest request are dropped.

pub const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";
pub const STYLESHEET: &str = "https://codepen.io/chriddyp/pen/bWLwgP.css";

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>cardpulse</title>
  <link rel="stylesheet" href="{{STYLESHEET}}">
  <script src="{{PLOTLY_JS}}"></script>
  <style>
    select[multiple] { width: 100%; min-height: 8em; }
    .graph-slot { width: 100%; }
  </style>
</head>
<body>
  <div id="app"></div>
  <script>
  (function () {
    const app = document.getElementById("app");
    const state = {};
    let latest = 0;
    let debug = false;

    function el(tag, attrs, children) {
      const node = document.createElement(tag);
      for (const [k, v] of Object.entries(attrs || {})) {
        if (k === "text") node.textContent = v; else node.setAttribute(k, v);
      }
      for (const child of children || []) node.appendChild(child);
      return node;
    }

    function dropdown(control) {
      const select = el("select", { id: control.id });
      if (control.multi) select.multiple = true;
      for (const opt of control.options) {
        const option = el("option", { value: opt, text: opt });
        option.selected = control.value.includes(opt);
        select.appendChild(option);
      }
      state[control.id + ".value"] = control.value.slice();
      select.addEventListener("change", () => {
        state[control.id + ".value"] =
          Array.from(select.selectedOptions).map((o) => o.value);
        update(control.id + ".value");
      });
      return select;
    }

    function dateRange(control) {
      const wrap = el("div", { id: control.id });
      for (const prop of ["start_date", "end_date"]) {
        const value = control[prop];
        state[control.id + "." + prop] = value;
        const input = el("input", { type: "date" });
        if (value) input.value = value.slice(0, 10);
        input.addEventListener("change", () => {
          state[control.id + "." + prop] = input.value || null;
          update(control.id + "." + prop);
        });
        wrap.appendChild(input);
      }
      return wrap;
    }

    async function update(triggered) {
      const seq = ++latest;
      const inputs = Object.entries(state).map(([key, value]) => {
        const dot = key.lastIndexOf(".");
        return { id: key.slice(0, dot), property: key.slice(dot + 1), value };
      });
      const started = performance.now();
      const resp = await fetch("/api/update", {
        method: "POST",
        headers: { "content-type": "application/json" },
        body: JSON.stringify({ triggered, inputs }),
      });
      if (seq !== latest) return;
      const body = await resp.json();
      if (!resp.ok) {
        console.error("update failed", body);
        return;
      }
      if (debug) console.debug("update", triggered, performance.now() - started, "ms");
      for (const [id, figure] of Object.entries(body)) {
        Plotly.react(id, figure.data, figure.layout);
      }
    }

    async function init() {
      const layout = await (await fetch("/api/layout")).json();
      debug = layout.debug;
      document.title = layout.title;
      app.appendChild(el("h1", { text: layout.title }));
      app.appendChild(el("label", { text: layout.description }));
      app.appendChild(el("br"));

      const row = el("div", { class: "row" });
      for (const control of layout.controls) {
        const widget = control.kind === "dropdown" ? dropdown(control) : dateRange(control);
        row.appendChild(el("div", { class: control.class_name }, [
          el("label", { text: control.label }),
          widget,
        ]));
      }
      app.appendChild(row);
      app.appendChild(el("br"));

      const graphs = el("div", {});
      for (const graph of layout.graphs) {
        graphs.appendChild(el("div", { class: graph.class_name }, [
          el("label", { text: graph.label }),
          el("div", { id: graph.id, class: "graph-slot", style: "height: " + graph.height }),
        ]));
      }
      app.appendChild(graphs);

      update(null);
    }

    init();
  })();
  </script>
</body>
</html>
"#;

/// The page with asset URLs filled in.
pub fn render() -> String {
  INDEX_HTML
    .replace("{{STYLESHEET}}", STYLESHEET)
    .replace("{{PLOTLY_JS}}", PLOTLY_JS)
}
