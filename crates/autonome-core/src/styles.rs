#![forbid(unsafe_code)]

//! Stylesheet injected at startup.
//!
//! The page's own CSS styles the layout; this fragment adds what the
//! enhancements need: the slide-up animation behind the reveal class, the
//! body fade-in keyed on the ready class, the button ripple, and the overlay
//! opacity transition.

use crate::PageConfig;
use crate::overlay::OVERLAY_CLASS;

/// Build the stylesheet for `config`'s class names and fade timing.
#[must_use]
pub fn stylesheet(config: &PageConfig) -> String {
    let reveal = &config.reveal.class_name;
    let ready = &config.ready_class;
    let fade_ms = config.overlay.fade_out_ms;
    format!(
        r#"
    .{reveal} {{
        animation: slideUp 0.6s ease forwards;
    }}

    @keyframes slideUp {{
        from {{
            opacity: 0;
            transform: translateY(30px);
        }}
        to {{
            opacity: 1;
            transform: translateY(0);
        }}
    }}

    body.{ready} {{
        opacity: 1;
        transition: opacity 0.3s ease;
    }}

    body {{
        opacity: 0;
    }}

    .cta-button, .submit-btn {{
        position: relative;
        overflow: hidden;
    }}

    .cta-button::before,
    .submit-btn::before {{
        content: '';
        position: absolute;
        top: 50%;
        left: 50%;
        width: 0;
        height: 0;
        background: rgba(255, 255, 255, 0.2);
        border-radius: 50%;
        transform: translate(-50%, -50%);
        transition: width 0.6s, height 0.6s;
    }}

    .cta-button:hover::before,
    .submit-btn:hover::before {{
        width: 300px;
        height: 300px;
    }}

    .{OVERLAY_CLASS} {{
        opacity: 0;
        transition: opacity {fade_ms}ms ease;
    }}
"#
    )
}
