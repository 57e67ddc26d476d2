/// Pause menu and quiz overlay. Text is rasterized fresh each frame;
/// the registry sweep reclaims the entries once the frame is presented.
pub(crate) struct UiOverlay {
    menu_open: bool,
    menu_selection: usize,
    exit_requested: bool,
    answer_selected: [bool; QUIZ_ANSWERS],
    last_dirs: [bool; DIR_COUNT],
}

const MENU_ITEMS: [&str; 2] = ["CONTINUE", "EXIT"];

impl UiOverlay {
    pub(crate) fn new() -> Self {
        Self {
            menu_open: false,
            menu_selection: 0,
            exit_requested: false,
            answer_selected: [false; QUIZ_ANSWERS],
            last_dirs: [false; DIR_COUNT],
        }
    }

    pub(crate) fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub(crate) fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub(crate) fn apply_input(&mut self, input: &InputState, sim: &mut WorldSimulator) {
        if sim.quiz.in_quiz() {
            for index in 0..QUIZ_ANSWERS {
                if input.answer_pressed(index) {
                    self.answer_selected[index] = !self.answer_selected[index];
                }
            }
            if input.confirm_pressed() {
                // Toggles reset after every submission, right or wrong.
                sim.quiz.submit(self.answer_selected);
                self.answer_selected = [false; QUIZ_ANSWERS];
            }
        } else {
            if input.pause_pressed() {
                self.menu_open = !self.menu_open;
                self.menu_selection = 0;
            }
            if self.menu_open {
                if self.dir_edge(input, Dir::Up) && self.menu_selection > 0 {
                    self.menu_selection -= 1;
                }
                if self.dir_edge(input, Dir::Down) && self.menu_selection + 1 < MENU_ITEMS.len() {
                    self.menu_selection += 1;
                }
                if input.confirm_pressed() {
                    match self.menu_selection {
                        0 => self.menu_open = false,
                        _ => self.exit_requested = true,
                    }
                }
            }
        }

        for dir in ALL_DIRS {
            self.last_dirs[dir.index()] = input.player_dir_down(dir);
        }
    }

    pub(crate) fn render(
        &self,
        sim: &WorldSimulator,
        textures: &mut TextureRegistry,
        compositor: &mut Compositor,
    ) {
        if sim.quiz.in_quiz() {
            self.render_quiz(sim, textures, compositor);
        } else if self.menu_open {
            self.render_menu(sim, textures, compositor);
        }
    }

    fn render_quiz(
        &self,
        sim: &WorldSimulator,
        textures: &mut TextureRegistry,
        compositor: &mut Compositor,
    ) {
        let Some(question) = sim.quiz.current_question() else {
            return;
        };
        let mut cursor = TextCursor::new();
        for line in wrap_text(&question.prompt, UI_WRAP_CHARS) {
            cursor.line(textures, compositor, &line, TextColor::White, UI_TEXT_LAYER);
        }
        for (index, answer) in question.answers.iter().enumerate() {
            let (color, layer) = if self.answer_selected[index] {
                (TextColor::Green, UI_FOCUS_LAYER)
            } else {
                (TextColor::White, UI_TEXT_LAYER)
            };
            cursor.line(
                textures,
                compositor,
                &format!("{}. {answer}", index + 1),
                color,
                layer,
            );
        }
    }

    fn render_menu(
        &self,
        sim: &WorldSimulator,
        textures: &mut TextureRegistry,
        compositor: &mut Compositor,
    ) {
        let mut cursor = TextCursor::new();
        cursor.line(textures, compositor, "PAUSED", TextColor::White, UI_TEXT_LAYER);
        for (index, item) in MENU_ITEMS.iter().enumerate() {
            let (color, layer) = if index == self.menu_selection {
                (TextColor::Green, UI_FOCUS_LAYER)
            } else {
                (TextColor::White, UI_TEXT_LAYER)
            };
            cursor.line(textures, compositor, item, color, layer);
        }

        let (hours, minutes, _seconds) = split_playtime(sim.playtime_ms());
        cursor.line(
            textures,
            compositor,
            &format!("TIME {hours:02}:{minutes:02}"),
            TextColor::White,
            UI_TEXT_LAYER,
        );
        cursor.line(
            textures,
            compositor,
            &format!("REMAINING {}", sim.remaining_pickups()),
            TextColor::White,
            UI_TEXT_LAYER,
        );
        if !sim.hints().is_empty() {
            cursor.line(textures, compositor, "HINTS:", TextColor::White, UI_TEXT_LAYER);
            for hint in sim.hints() {
                for line in wrap_text(hint, UI_WRAP_CHARS) {
                    cursor.line(textures, compositor, &line, TextColor::Gray, UI_TEXT_LAYER);
                }
            }
        }
    }

    fn dir_edge(&self, input: &InputState, dir: Dir) -> bool {
        input.player_dir_down(dir) && !self.last_dirs[dir.index()]
    }
}

struct TextCursor {
    y: i32,
}

impl TextCursor {
    fn new() -> Self {
        Self { y: UI_MARGIN_PX }
    }

    fn line(
        &mut self,
        textures: &mut TextureRegistry,
        compositor: &mut Compositor,
        text: &str,
        color: TextColor,
        layer: i32,
    ) {
        let texture = textures.make_text(text, color);
        compositor.enqueue(DrawItem {
            texture,
            x: UI_MARGIN_PX,
            y: self.y,
            flip_vertical: false,
            flip_horizontal: false,
            layer,
            overlay: true,
        });
        self.y += UI_LINE_SPACING_PX;
    }
}

/// Greedy word wrap. A `;` ends the line it sits on and never renders,
/// which lets data files place their own breaks.
pub(crate) fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for segment in text.split(';') {
        let mut current = String::new();
        for word in segment.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
            } else if current.len() + 1 + word.len() <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}
