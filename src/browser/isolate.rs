use crate::{
    browser::SlidePage,
    config::export::Timings,
    foundation::clock::Clock,
    foundation::error::SlidecastResult,
    slides::catalog::{SlideDescriptor, SlideKind},
};

/// Content elements faded out before capture.
pub const HIDE_SELECTORS: &[&str] = &[
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "p",
    "span",
    ".main-title",
    ".subtitle",
    ".slide-number",
    ".slide-type",
    ".title-section",
    ".subtitle-section",
    ".brand-section",
    ".logo-container",
    ".logo-text",
    ".slide-info",
    ".data-card",
    ".chart-container",
    ".text-content",
    ".card-info",
    ".card-title",
    ".card-description",
    ".accent-line:not(.background-accent)",
    ".corner-accent:not(.background-corner)",
    ".content-area",
    ".text-overlay",
];

/// Decorative elements forced visible.
pub const PRESERVE_SELECTORS: &[&str] = &[
    ".background-layer",
    ".slide-container",
    ".fluid-shape",
    ".floating-element",
    ".wave-element",
    ".organic-shape",
    ".flow-shape",
    ".particle",
    ".primary-flow",
    ".secondary-flow",
    ".circle-accent",
    ".oval-accent",
    ".decorative-elements",
    ".animated-bg",
    ".background-accent",
    ".background-corner",
];

/// Stylesheet injected after isolation. Keeps every animation running and pins the durations
/// of the named decorative classes so clips loop at predictable points.
pub const OVERRIDE_CSS: &str = r#"
* {
  animation-play-state: running !important;
  backface-visibility: hidden;
  transform-style: preserve-3d;
}
.fluid-shape, .floating-element, .organic-shape {
  animation-duration: 15s !important;
  animation-iteration-count: infinite !important;
  animation-timing-function: ease-in-out !important;
}
.wave-element {
  animation-duration: 12s !important;
  animation-iteration-count: infinite !important;
}
.particle {
  animation-duration: 8s !important;
  animation-iteration-count: infinite !important;
}
body, html {
  margin: 0 !important;
  padding: 0 !important;
  overflow: hidden !important;
  width: 100vw !important;
  height: 100vh !important;
}
.slide-container {
  width: 100vw !important;
  height: 100vh !important;
  position: relative !important;
}
"#;

/// Marker set on the injected `<style>` element.
pub const OVERRIDE_STYLE_ID: &str = "slidecast-background-override";

/// Element counts reported by the isolation script.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IsolationReport {
    /// Elements hidden.
    pub hidden: u64,
    /// Elements forced visible.
    pub preserved: u64,
}

/// JavaScript that hides content, preserves decoration and injects [`OVERRIDE_CSS`].
///
/// `extra_hide` is appended to [`HIDE_SELECTORS`]. Evaluates to `{ hidden, preserved }`.
/// Selectors matching nothing are skipped silently.
pub fn isolation_script(kind: SlideKind, extra_hide: &[String]) -> String {
    let hide_set: Vec<&str> = HIDE_SELECTORS
        .iter()
        .copied()
        .chain(extra_hide.iter().map(String::as_str))
        .collect();
    let hide = serde_json::to_string(&hide_set).unwrap_or_else(|_| "[]".to_string());
    let keep = serde_json::to_string(PRESERVE_SELECTORS).unwrap_or_else(|_| "[]".to_string());
    let css = serde_json::to_string(OVERRIDE_CSS).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        r#"(() => {{
  const kind = "{kind}";
  let hidden = 0, preserved = 0;
  for (const sel of {hide}) {{
    document.querySelectorAll(sel).forEach(el => {{
      el.style.opacity = '0';
      el.style.visibility = 'hidden';
      hidden++;
    }});
  }}
  for (const sel of {keep}) {{
    document.querySelectorAll(sel).forEach(el => {{
      el.style.visibility = 'visible';
      el.style.opacity = el.style.opacity || '1';
      preserved++;
    }});
  }}
  if (!document.getElementById("{id}")) {{
    const style = document.createElement('style');
    style.id = "{id}";
    style.dataset.slideKind = kind;
    style.textContent = {css};
    document.head.appendChild(style);
  }}
  return {{ hidden, preserved }};
}})()"#,
        kind = kind.as_str(),
        id = OVERRIDE_STYLE_ID,
    )
}

/// JavaScript that pauses every animation, forces a reflow, restarts elements with a computed
/// animation and resumes them 50 ms later. Best effort: nothing verifies the restart.
pub const SYNC_SCRIPT: &str = r#"(() => {
  const all = Array.from(document.querySelectorAll('*'));
  all.forEach(el => { el.style.animationPlayState = 'paused'; });
  void document.body.offsetHeight;
  let restarted = 0;
  all.forEach(el => {
    if (el.style.animation || getComputedStyle(el).animationName !== 'none') {
      const current = el.style.animation;
      el.style.animation = 'none';
      void el.offsetHeight;
      el.style.animation = current;
      restarted++;
    }
  });
  setTimeout(() => {
    all.forEach(el => { el.style.animationPlayState = 'running'; });
  }, 50);
  return restarted;
})()"#;

/// Hide text content (plus the slide's own `hide` selectors) and keep the decorative
/// background animating.
pub fn isolate_background(
    page: &mut dyn SlidePage,
    slide: &SlideDescriptor,
    timings: &Timings,
    clock: &dyn Clock,
) -> SlidecastResult<IsolationReport> {
    let value = page.evaluate(&isolation_script(slide.kind, &slide.hide), false)?;
    let count = |key: &str| {
        value
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(|v| v.as_u64())
            .unwrap_or(0)
    };
    let report = IsolationReport {
        hidden: count("hidden"),
        preserved: count("preserved"),
    };
    tracing::debug!(
        hidden = report.hidden,
        preserved = report.preserved,
        "background isolated"
    );
    clock.sleep(timings.isolate_settle);
    Ok(report)
}

/// Restart all CSS animations so captures begin near the same phase, then wait `sync_delay`.
pub fn synchronize_animations(
    page: &mut dyn SlidePage,
    timings: &Timings,
    clock: &dyn Clock,
) -> SlidecastResult<()> {
    let restarted = page.evaluate(SYNC_SCRIPT, false)?;
    tracing::debug!(
        restarted = restarted.and_then(|v| v.as_u64()).unwrap_or(0),
        "animations restarted"
    );
    clock.sleep(timings.sync_delay);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/browser/isolate.rs"]
mod tests;
