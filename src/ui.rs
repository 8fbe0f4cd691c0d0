//! Parameter-editing panels.
//!
//! The panels write straight into the core's parameter structs: the
//! surface editor diffs its own snapshot, so equation and grid edits need
//! no change detection here, while camera edits are applied through
//! [`Camera::set_pose`]/[`Camera::set_params`] only when a widget actually
//! changed.

use crate::camera::Camera;
use crate::surface::SurfaceEditor;

/// Equation, resolution, and domain editing.
pub fn surface_panel(ctx: &egui::Context, editor: &mut SurfaceEditor) {
    egui::Window::new("Model Params").resizable(false).show(ctx, |ui| {
        egui::Grid::new("model_params").num_columns(2).show(ui, |ui| {
            let equations = &mut editor.params.equations;
            ui.label("x =");
            ui.add(
                egui::TextEdit::singleline(&mut equations.x)
                    .desired_width(240.0),
            );
            ui.end_row();
            ui.label("y =");
            ui.add(
                egui::TextEdit::singleline(&mut equations.y)
                    .desired_width(240.0),
            );
            ui.end_row();
            ui.label("z =");
            ui.add(
                egui::TextEdit::singleline(&mut equations.z)
                    .desired_width(240.0),
            );
            ui.end_row();

            let grid = &mut editor.params.grid;
            ui.label("Num cells (u, v)");
            ui.horizontal(|ui| {
                ui.add(egui::DragValue::new(&mut grid.res_x).range(1..=4096));
                ui.add(egui::DragValue::new(&mut grid.res_y).range(1..=4096));
            });
            ui.end_row();

            ui.label("Range (u)");
            ui.horizontal(|ui| {
                ui.add(egui::DragValue::new(&mut grid.u_min).speed(0.1));
                ui.add(egui::DragValue::new(&mut grid.u_max).speed(0.1));
            });
            ui.end_row();

            ui.label("Range (v)");
            ui.horizontal(|ui| {
                ui.add(egui::DragValue::new(&mut grid.v_min).speed(0.1));
                ui.add(egui::DragValue::new(&mut grid.v_max).speed(0.1));
            });
            ui.end_row();
        });
    });
}

/// Camera pose/projection editing plus the FPS readout.
pub fn camera_panel(ctx: &egui::Context, camera: &mut Camera, fps: f32) {
    egui::Window::new("Camera Params").resizable(false).show(ctx, |ui| {
        let mut pos = camera.pos();
        let mut look = camera.look();
        let mut pose_diff = false;

        let mut params = camera.params();
        let mut cam_diff = false;

        egui::Grid::new("camera_params").num_columns(2).show(ui, |ui| {
            ui.label("Position");
            ui.horizontal(|ui| {
                for value in [&mut pos.x, &mut pos.y, &mut pos.z] {
                    pose_diff |= ui
                        .add(egui::DragValue::new(value).speed(0.1))
                        .changed();
                }
            });
            ui.end_row();

            ui.label("Direction (rad)");
            ui.horizontal(|ui| {
                for value in [&mut look.x, &mut look.y] {
                    pose_diff |= ui
                        .add(egui::DragValue::new(value).speed(0.02))
                        .changed();
                }
            });
            ui.end_row();

            ui.label("Field of view (°)");
            let mut fov_degrees = params.fov.to_degrees();
            cam_diff |= ui
                .add(egui::DragValue::new(&mut fov_degrees).range(10.0..=170.0))
                .changed();
            params.fov = fov_degrees.to_radians();
            ui.end_row();

            ui.label("Clipping range");
            ui.horizontal(|ui| {
                cam_diff |= ui
                    .add(egui::DragValue::new(&mut params.near).speed(0.05))
                    .changed();
                cam_diff |= ui
                    .add(egui::DragValue::new(&mut params.far).speed(1.0))
                    .changed();
            });
            ui.end_row();

            ui.label("Movement speed");
            cam_diff |= ui
                .add(egui::DragValue::new(&mut params.move_speed).speed(0.5))
                .changed();
            ui.end_row();

            ui.label("Look speed (rad/s)");
            ui.horizontal(|ui| {
                for value in [&mut params.look_speed.x, &mut params.look_speed.y]
                {
                    cam_diff |= ui
                        .add(egui::DragValue::new(value).speed(0.05))
                        .changed();
                }
            });
            ui.end_row();
        });

        ui.separator();
        ui.label(format!("{fps:.0} fps"));

        if pose_diff {
            camera.set_pose(pos, look);
        }
        if cam_diff {
            log::info!("refreshing camera");
            camera.set_params(params);
        }
    });
}
