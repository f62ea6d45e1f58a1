//! ZenQuest entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, MouseEvent};

    use zen_quest::consts::SIM_DT;
    use zen_quest::sim::{BreathPhase, GamePhase};
    use zen_quest::{AppEvent, Content, Difficulty, Screen, Settings, Toast, ZenQuest};

    /// Seconds a toast stays on screen
    const TOAST_SECS: f32 = 4.0;

    const SKELETON: &str = r#"<nav id="nav"></nav><main id="app"></main><div id="toasts"></div>"#;

    /// Page instance holding the app and what has been drawn
    struct Page {
        app: ZenQuest,
        last_time: f64,
        /// Layout key of the markup currently in `#app`
        drawn: String,
        toasts: Vec<(Toast, f32)>,
        toasts_dirty: bool,
    }

    impl Page {
        fn new(app: ZenQuest) -> Self {
            Self {
                app,
                last_time: 0.0,
                drawn: String::new(),
                toasts: Vec::new(),
                toasts_dirty: false,
            }
        }

        /// Run simulation steps and collect notifications
        fn update(&mut self, dt: f32) {
            self.app.frame(dt);

            for event in self.app.drain_events() {
                match event {
                    AppEvent::Toast(toast) => {
                        self.toasts.push((toast, TOAST_SECS));
                        self.toasts_dirty = true;
                    }
                    AppEvent::GameCompleted { screen, success } => {
                        log::info!("{:?} finished, success: {}", screen, success);
                    }
                    AppEvent::QuestsUnlocked { ids } => {
                        log::info!("Unlocked quests: {:?}", ids);
                    }
                    other => log::debug!("{:?}", other),
                }
            }

            let before = self.toasts.len();
            for (_, remaining) in &mut self.toasts {
                *remaining -= dt;
            }
            self.toasts.retain(|(_, remaining)| *remaining > 0.0);
            if self.toasts.len() != before {
                self.toasts_dirty = true;
            }
        }

        /// Handle a `data-action` click
        fn dispatch(&mut self, action: &str, arg: Option<&str>) {
            match (action, arg) {
                ("start-quest", _) => self.app.start_quest(),
                ("nav", Some(id)) => {
                    if let Some(screen) = Screen::from_id(id) {
                        self.app.navigate(screen);
                    }
                }
                ("mood", Some(value)) => {
                    if let Ok(value) = value.parse() {
                        self.app.select_mood(value);
                    }
                }
                ("submit-mood", _) => {
                    self.app.submit_mood();
                }
                ("quest", Some(id)) => {
                    self.app.select_quest(id);
                }
                ("sanctuary-start", _) => self.app.start_sanctuary(),
                ("sanctuary-reset", _) => self.app.reset_sanctuary(),
                ("bird", Some(id)) => {
                    if let Ok(id) = id.parse() {
                        self.app.capture(id);
                    }
                }
                ("battle-start", _) => {
                    self.app.start_battle();
                }
                ("battle-reset", _) => self.app.reset_battle(),
                ("difficulty", Some(name)) => {
                    if let Some(difficulty) = Difficulty::from_str(name) {
                        let mut settings = self.app.settings.clone();
                        settings.apply_difficulty(difficulty);
                        match self.app.apply_settings(settings) {
                            Ok(true) => self.app.settings.save(),
                            Ok(false) => {}
                            Err(e) => log::warn!("Rejected settings: {}", e),
                        }
                    }
                }
                _ => log::debug!("Unhandled action {} {:?}", action, arg),
            }
        }

        fn layout_key(&self) -> String {
            let app = &self.app;
            match app.screen() {
                Screen::Home => format!("home:{:?}", app.user_mood().map(|m| m.value)),
                Screen::Mood => format!(
                    "mood:{:?}:{}",
                    app.mood.selected(),
                    app.mood.is_submitted()
                ),
                Screen::Map => format!(
                    "map:{}:{:?}:{:?}",
                    app.map.completed_count(),
                    app.map.selected().map(|q| q.id.as_str()),
                    app.settings.difficulty
                ),
                Screen::Breathing => format!("breathing:{:?}", app.battle.phase),
                Screen::Sanctuary => format!(
                    "sanctuary:{:?}:{:?}",
                    app.sanctuary.phase, app.settings.difficulty
                ),
            }
        }

        /// Redraw the screen markup when its layout changed, then refresh the
        /// per-frame parts
        fn render(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let key = self.layout_key();
            if key != self.drawn {
                if let Some(root) = document.get_element_by_id("app") {
                    root.set_inner_html(&screen_markup(&self.app));
                }
                update_nav(&document, self.app.screen());
                self.drawn = key;
            }

            match self.app.screen() {
                Screen::Sanctuary => update_sanctuary(&document, &self.app),
                Screen::Breathing => update_battle(&document, &self.app),
                _ => {}
            }

            if self.toasts_dirty {
                if let Some(el) = document.get_element_by_id("toasts") {
                    let html: String = self
                        .toasts
                        .iter()
                        .map(|(t, _)| {
                            format!(
                                r#"<div class="toast"><strong>{}</strong><p>{}</p></div>"#,
                                t.title, t.description
                            )
                        })
                        .collect();
                    el.set_inner_html(&html);
                }
                self.toasts_dirty = false;
            }
        }
    }

    fn screen_markup(app: &ZenQuest) -> String {
        match app.screen() {
            Screen::Home => {
                let tracking = app
                    .user_mood()
                    .map(|m| {
                        format!(
                            r#"<div class="card">Tracking Active: {} {}</div>"#,
                            m.emoji, m.label
                        )
                    })
                    .unwrap_or_default();
                format!(
                    r#"<section class="home"><h1>ZenQuest</h1>
                    <p>Your journey to inner peace, one quest at a time.</p>{}
                    <button data-action="start-quest">Start Your Quest</button></section>"#,
                    tracking
                )
            }
            Screen::Mood => {
                if app.mood.is_submitted() {
                    let support = match app.user_mood() {
                        Some(m) if m.needs_support() => {
                            "<p>It's okay to not be okay. Your quest today can be gentle.</p>"
                        }
                        _ => "",
                    };
                    return format!(
                        r#"<section class="mood"><div class="card">Thanks for checking in 💙{}</div></section>"#,
                        support
                    );
                }
                let selected = app.mood.selected();
                let buttons: String = app
                    .content()
                    .moods
                    .iter()
                    .map(|m| {
                        let class = if selected == Some(m.value) { "mood selected" } else { "mood" };
                        format!(
                            r#"<button class="{}" data-action="mood" data-arg="{}"><span>{}</span>{}<small>{}</small></button>"#,
                            class, m.value, m.emoji, m.label, m.description
                        )
                    })
                    .collect();
                let disabled = if selected.is_none() { " disabled" } else { "" };
                format!(
                    r#"<section class="mood"><h2>How are you feeling today?</h2>{}
                    <button data-action="submit-mood"{}>Submit</button></section>"#,
                    buttons, disabled
                )
            }
            Screen::Map => {
                let nodes: String = app
                    .map
                    .quests
                    .iter()
                    .map(|q| {
                        let state = match (q.completed, q.unlocked) {
                            (true, _) => "completed",
                            (false, true) => "open",
                            (false, false) => "locked",
                        };
                        format!(
                            r#"<button class="quest {}" style="left:{}%;top:{}%" data-action="quest" data-arg="{}" title="{}">{}</button>"#,
                            state,
                            q.position.x,
                            q.position.y,
                            q.id,
                            q.title,
                            q.kind.icon()
                        )
                    })
                    .collect();
                let detail = app
                    .map
                    .selected()
                    .map(|q| format!(r#"<div class="card"><h3>{}</h3><p>{}</p></div>"#, q.title, q.description))
                    .unwrap_or_default();
                format!(
                    r#"<section class="map"><h2>Adventure Map</h2><p>{:.0}% complete</p>
                    <div class="map-field">{}</div>{}{}</section>"#,
                    app.map.progress_percent(),
                    nodes,
                    detail,
                    difficulty_picker(app.settings.difficulty)
                )
            }
            Screen::Breathing => {
                let controls = match app.battle.phase {
                    BreathPhase::Ready => r#"<button data-action="battle-start">Begin Battle</button>"#,
                    BreathPhase::Victory | BreathPhase::Defeat => {
                        r#"<button data-action="battle-start">Battle Again</button>"#
                    }
                    _ => r#"<button data-action="battle-reset">Reset</button>"#,
                };
                format!(
                    r#"<section class="breathing"><div id="monster" class="monster">👹</div>
                    <div class="bar"><div id="health"></div></div>
                    <div id="orb" class="orb"></div>
                    <p id="breath-instruction"></p><p id="breath-count"></p>{}</section>"#,
                    controls
                )
            }
            Screen::Sanctuary => {
                let controls = match app.sanctuary.phase {
                    GamePhase::Ready => r#"<button data-action="sanctuary-start">Start</button>"#,
                    GamePhase::Playing => r#"<button data-action="sanctuary-reset">Reset</button>"#,
                    GamePhase::Victory | GamePhase::TimeUp => {
                        r#"<button data-action="sanctuary-start">Play Again</button>"#
                    }
                };
                format!(
                    r#"<section class="sanctuary"><div class="hud">
                    <span id="sanct-instruction"></span><span id="sanct-time"></span>
                    <span id="sanct-count"></span>
                    <div class="bar"><div id="sanct-progress"></div></div>
                    <span id="sanct-notes"></span></div>
                    <div id="field" class="field"></div>{}</section>"#,
                    controls
                )
            }
        }
    }

    fn difficulty_picker(current: Difficulty) -> String {
        [Difficulty::Gentle, Difficulty::Standard, Difficulty::Brisk]
            .iter()
            .map(|d| {
                let class = if *d == current { "chip active" } else { "chip" };
                format!(
                    r#"<button class="{}" data-action="difficulty" data-arg="{}">{}</button>"#,
                    class,
                    d.as_str(),
                    d.as_str()
                )
            })
            .collect()
    }

    fn update_nav(document: &Document, screen: Screen) {
        let Ok(items) = document.query_selector_all("#nav [data-action=nav]") else {
            return;
        };
        for i in 0..items.length() {
            let Some(el) = items.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let active = el.get_attribute("data-arg").as_deref() == Some(screen.id());
            let _ = el.class_list().toggle_with_force("active", active);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_style(document: &Document, id: &str, property: &str, value: &str) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property(property, value);
        }
    }

    fn update_sanctuary(document: &Document, app: &ZenQuest) {
        let snap = app.sanctuary_snapshot();
        set_text(document, "sanct-instruction", &snap.instruction);
        set_text(document, "sanct-time", &format!("⏱ {}s", snap.time_remaining));
        set_text(
            document,
            "sanct-count",
            &format!("🐦 {}/{}", snap.captured, snap.target),
        );
        set_style(document, "sanct-progress", "width", &format!("{}%", snap.percent));
        set_text(
            document,
            "sanct-notes",
            &format!("{} {}", snap.progress_note, snap.clock_note),
        );

        let Some(field) = document.get_element_by_id("field") else {
            return;
        };

        // Update birds in place so a click never lands on a replaced node
        if let Ok(nodes) = field.query_selector_all("[data-action=bird]") {
            for i in 0..nodes.length() {
                let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
                    continue;
                };
                let id = el.get_attribute("data-arg").and_then(|s| s.parse::<u32>().ok());
                match id.and_then(|id| snap.birds.iter().find(|b| b.id == id)) {
                    Some(bird) => place_bird(&el, bird),
                    None => el.remove(),
                }
            }
        }
        for bird in &snap.birds {
            let selector = format!("[data-arg=\"{}\"]", bird.id);
            if matches!(field.query_selector(&selector), Ok(Some(_))) {
                continue;
            }
            let Ok(el) = document.create_element("button") else {
                continue;
            };
            let _ = el.set_attribute("data-action", "bird");
            let _ = el.set_attribute("data-arg", &bird.id.to_string());
            el.set_text_content(Some(bird.glyph));
            if let Ok(el) = el.dyn_into::<HtmlElement>() {
                place_bird(&el, bird);
                let _ = field.append_child(&el);
            }
        }
    }

    fn place_bird(el: &HtmlElement, bird: &zen_quest::sim::Bird) {
        let style = el.style();
        let _ = style.set_property("left", &format!("{}%", bird.pos.x));
        let _ = style.set_property("top", &format!("{}%", bird.pos.y));
        let _ = style.set_property("transform", &format!("scale({})", bird.size));
        let class = if bird.captured { "bird captured" } else { "bird" };
        let _ = el.set_attribute("class", class);
    }

    fn update_battle(document: &Document, app: &ZenQuest) {
        let snap = app.battle_snapshot();
        set_text(document, "breath-instruction", snap.instruction);
        set_text(
            document,
            "breath-count",
            &format!("Breaths: {}", snap.breaths),
        );
        set_style(document, "health", "width", &format!("{}%", snap.monster_health));
        set_style(document, "orb", "transform", &format!("scale({})", snap.orb_scale));
        set_style(
            document,
            "monster",
            "transform",
            &format!("scale({})", snap.monster_scale),
        );
        set_style(document, "monster", "opacity", &snap.monster_opacity.to_string());
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("ZenQuest starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }
        if document.get_element_by_id("app").is_none() {
            if let Some(body) = document.body() {
                body.set_inner_html(SKELETON);
            }
        }
        if let Some(nav) = document.get_element_by_id("nav") {
            let html: String = Screen::ALL
                .iter()
                .map(|s| {
                    let (label, icon) = s.label();
                    format!(
                        r#"<button data-action="nav" data-arg="{}">{} {}</button>"#,
                        s.id(),
                        icon,
                        label
                    )
                })
                .collect();
            nav.set_inner_html(&html);
        }

        let content = Content::builtin().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let app = ZenQuest::new(settings, content, seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let page = Rc::new(RefCell::new(Page::new(app)));

        log::info!("App initialized with seed: {}", seed);

        setup_click_handler(&document, page.clone());
        setup_visibility(&document, page.clone());

        request_animation_frame(page);

        log::info!("ZenQuest running!");
        Ok(())
    }

    fn setup_click_handler(document: &Document, page: Rc<RefCell<Page>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let Some(target) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|t| t.closest("[data-action]").ok().flatten())
            else {
                return;
            };
            let Some(action) = target.get_attribute("data-action") else {
                return;
            };
            let arg = target.get_attribute("data-arg");
            page.borrow_mut().dispatch(&action, arg.as_deref());
        });
        let _ = document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// A hidden tab stops requesting frames; restart the clock on return so
    /// the gap is not replayed
    fn setup_visibility(document: &Document, page: Rc<RefCell<Page>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Visible {
                page.borrow_mut().last_time = 0.0;
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(page: Rc<RefCell<Page>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(page, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(page: Rc<RefCell<Page>>, time: f64) {
        {
            let mut p = page.borrow_mut();

            let dt = if p.last_time > 0.0 {
                ((time - p.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            p.last_time = time;

            p.update(dt);
            p.render();
        }

        request_animation_frame(page);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use zen_quest::sim::GamePhase;
    use zen_quest::{Content, Difficulty, Screen, Settings, ZenQuest};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("ZenQuest (native) starting...");
    log::info!("The web version runs in the browser; this is a headless demo session");

    let difficulty = std::env::args()
        .nth(1)
        .and_then(|arg| Difficulty::from_str(&arg))
        .unwrap_or_default();
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut app = ZenQuest::new(
        Settings::from_difficulty(difficulty),
        Content::builtin()?,
        seed,
    )?;
    log::info!("Difficulty {}, seed {}", difficulty.as_str(), seed);

    app.start_quest();
    app.select_mood(4);
    app.submit_mood();
    run_while(&mut app, |a| a.screen() == Screen::Mood, 200);

    // Bird Sanctuary: tap the oldest free bird every 1.5 s
    app.select_quest("5");
    app.start_sanctuary();
    let mut steps = 0u32;
    while app.screen() == Screen::Sanctuary
        && app.sanctuary.phase != GamePhase::TimeUp
        && steps < 2000
    {
        if steps % 30 == 0 {
            let id = app.sanctuary.birds.iter().find(|b| !b.captured).map(|b| b.id);
            if let Some(id) = id {
                app.capture(id);
            }
        }
        app.step();
        steps += 1;
        report(&mut app)?;
    }

    if app.screen() != Screen::Map {
        // Time ran out; no completion, so walk back by hand
        app.navigate(Screen::Map);
    }

    // Breathing battle plays itself
    app.select_quest("1");
    app.start_battle();
    run_while(&mut app, |a| a.screen() == Screen::Breathing, 4000);

    log::info!(
        "Session over: {}/{} quests complete ({:.0}%)",
        app.map.completed_count(),
        app.map.quests.len(),
        app.map.progress_percent()
    );
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn run_while(
    app: &mut zen_quest::ZenQuest,
    cond: impl Fn(&zen_quest::ZenQuest) -> bool,
    max_steps: u32,
) {
    for _ in 0..max_steps {
        if !cond(app) {
            return;
        }
        app.step();
        if let Err(e) = report(app) {
            log::warn!("Could not print event: {}", e);
        }
    }
}

/// Print drained events as JSON lines
#[cfg(not(target_arch = "wasm32"))]
fn report(app: &mut zen_quest::ZenQuest) -> Result<(), serde_json::Error> {
    for event in app.drain_events() {
        if let zen_quest::AppEvent::GameCompleted {
            screen: zen_quest::Screen::Sanctuary,
            ..
        } = event
        {
            println!("{}", serde_json::to_string(&app.sanctuary_snapshot())?);
        }
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
