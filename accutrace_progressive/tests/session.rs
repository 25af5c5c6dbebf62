use accutrace_progressive::{
    accumulation::BufferIndices,
    camera::{SamplingSettings, TraceUniforms},
    session::{FramePipeline, RenderSession},
};
use accutrace_scene::{Camera, CameraController, MovementInput, SceneCounts};
use nalgebra_glm as glm;

const DT: f32 = 1.0 / 60.0;

#[derive(Debug, PartialEq)]
enum Call {
    Trace(BufferIndices, TraceUniforms),
    Present(BufferIndices),
}

#[derive(Default)]
struct RecordingPipeline {
    calls: Vec<Call>,
}

impl FramePipeline for RecordingPipeline {
    fn trace(&mut self, indices: BufferIndices, uniforms: &TraceUniforms) {
        self.calls.push(Call::Trace(indices, *uniforms));
    }

    fn present(&mut self, indices: BufferIndices) {
        self.calls.push(Call::Present(indices));
    }
}

fn session() -> RenderSession {
    RenderSession::new(
        Camera::new(glm::vec3(0.0, 0.5, -2.0)),
        CameraController::default(),
        SamplingSettings::default(),
        [320, 240],
        SceneCounts {
            spheres: 2,
            triangles: 12,
            instances: 1,
        },
    )
}

fn still() -> MovementInput {
    MovementInput::default()
}

fn walking() -> MovementInput {
    MovementInput {
        forward: true,
        ..Default::default()
    }
}

#[test]
fn still_ticks_count_up() {
    let mut session = session();
    let mut pipeline = RecordingPipeline::default();
    let frames = (0..5)
        .map(|_| session.tick(&still(), DT, &mut pipeline).frame)
        .collect::<Vec<_>>();
    assert_eq!(frames, vec![0, 1, 2, 3, 4]);
    assert_eq!(session.frame(), 5);
}

#[test]
fn write_target_is_never_the_read_target() {
    let mut session = session();
    let mut pipeline = RecordingPipeline::default();
    for i in 0..8 {
        let input = if i % 3 == 0 { walking() } else { still() };
        let report = session.tick(&input, DT, &mut pipeline);
        assert_eq!(report.indices.write, 1 - report.indices.read);
        assert_eq!(report.indices, BufferIndices::for_frame(report.frame));
    }
}

#[test]
fn trace_comes_before_present_with_the_same_indices() {
    let mut session = session();
    let mut pipeline = RecordingPipeline::default();
    session.tick(&still(), DT, &mut pipeline);
    session.tick(&still(), DT, &mut pipeline);

    assert_eq!(pipeline.calls.len(), 4);
    for pair in pipeline.calls.chunks(2) {
        match pair {
            [Call::Trace(traced, _), Call::Present(presented)] => assert_eq!(traced, presented),
            other => panic!("unexpected call order {:?}", other),
        }
    }
}

#[test]
fn moving_resets_then_stillness_resumes_accumulation() {
    let mut session = session();
    let mut pipeline = RecordingPipeline::default();

    let inputs = [still(), still(), still(), walking(), still()];
    let reports = inputs
        .iter()
        .map(|input| session.tick(input, DT, &mut pipeline))
        .collect::<Vec<_>>();

    let frames = reports.iter().map(|r| r.frame).collect::<Vec<_>>();
    assert_eq!(frames, vec![0, 1, 2, 0, 1]);
    assert!(reports[3].moved);
    assert!(!reports[3].accumulate);
    assert!(reports[4].accumulate);
    assert_eq!(reports[3].indices, BufferIndices { read: 0, write: 1 });
    assert_eq!(reports[4].indices, BufferIndices { read: 1, write: 0 });
}

#[test]
fn cancelling_keys_keep_accumulating() {
    let mut session = session();
    let mut pipeline = RecordingPipeline::default();
    let cancelling = MovementInput {
        left: true,
        right: true,
        ..Default::default()
    };
    session.tick(&still(), DT, &mut pipeline);
    let report = session.tick(&cancelling, DT, &mut pipeline);
    assert!(!report.moved);
    assert_eq!(report.frame, 1);
}

#[test]
fn uniforms_carry_counter_camera_and_accumulate_flag() {
    let mut session = session();
    let mut pipeline = RecordingPipeline::default();
    session.tick(&still(), DT, &mut pipeline);
    session.tick(&still(), DT, &mut pipeline);
    session.tick(&walking(), DT, &mut pipeline);

    let uniforms = pipeline
        .calls
        .iter()
        .filter_map(|call| match call {
            Call::Trace(_, uniforms) => Some(*uniforms),
            Call::Present(_) => None,
        })
        .collect::<Vec<_>>();

    assert_eq!(uniforms[0].rendered_frames, 0);
    assert_eq!(uniforms[0].accumulate, 1);
    assert_eq!(uniforms[1].rendered_frames, 1);
    assert_eq!(uniforms[2].rendered_frames, 0);
    assert_eq!(uniforms[2].accumulate, 0);

    let camera = session.camera();
    assert_eq!(uniforms[2].camera_position, [camera.position.x, camera.position.y, camera.position.z]);
    assert_eq!(uniforms[2].resolution, [320, 240]);
    assert_eq!(uniforms[2].num_triangles, 12);
    assert_eq!(uniforms[2].samples_per_pixel, 3);
}

#[test]
fn resize_and_scene_swap_restart_accumulation() {
    let mut session = session();
    let mut pipeline = RecordingPipeline::default();
    session.tick(&still(), DT, &mut pipeline);
    session.tick(&still(), DT, &mut pipeline);

    session.resize([640, 480]);
    assert_eq!(session.frame(), 0);
    let report = session.tick(&still(), DT, &mut pipeline);
    assert_eq!(report.frame, 0);
    assert_eq!(session.resolution(), [640, 480]);

    session.set_scene_counts(SceneCounts::default());
    assert_eq!(session.frame(), 0);
    assert_eq!(session.counts(), SceneCounts::default());

    session.tick(&still(), DT, &mut pipeline);
    session.reset_accumulation();
    assert_eq!(session.frame(), 0);
}

#[test]
fn works_through_a_trait_object() {
    let mut session = session();
    let mut pipeline = RecordingPipeline::default();
    let dynamic: &mut dyn FramePipeline = &mut pipeline;
    session.tick(&still(), DT, dynamic);
    assert_eq!(pipeline.calls.len(), 2);
}
