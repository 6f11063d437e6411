//! Starter project shown when no project file is given.

use reelgen_core::Result;
use reelgen_timeline::{Keyframe, MediaItem, MediaKind, Project, TrackKind};

pub fn demo_project() -> Result<Project> {
    let mut project = Project::new("Demo Project");

    let video = project.add_track(TrackKind::Video, "Video");
    let music = project.add_track(TrackKind::Music, "Music");
    let voiceover = project.add_track(TrackKind::Voiceover, "Voiceover");

    let intro = project.add_media(
        MediaItem::new(MediaKind::Video)
            .with_prompt("Drone shot over a misty forest at sunrise")
            .with_duration(6000.0),
    );
    let title = project.add_media(
        MediaItem::new(MediaKind::Image).with_prompt("Minimal title card, warm palette"),
    );
    let score = project.add_media(MediaItem {
        waveform: Some(
            (0..120)
                .map(|i| ((i as f32 * 0.37).sin() * 0.6).abs() + 0.1)
                .collect(),
        ),
        ..MediaItem::new(MediaKind::Music)
            .with_prompt("Ambient piano, slow build")
            .with_duration(24_000.0)
    });
    let narration = project.add_media(
        MediaItem::new(MediaKind::Voiceover).with_prompt("Every morning starts quietly."),
    );

    let mut opening = Keyframe::new(video, intro, MediaKind::Video, 0.0, 4000.0);
    opening.start_offset = 1000.0;
    project.add_keyframe(opening)?;
    project.add_keyframe(Keyframe::new(video, title, MediaKind::Image, 6000.0, 3000.0))?;
    project.add_keyframe(Keyframe::new(music, score, MediaKind::Music, 0.0, 18_000.0))?;
    project.add_keyframe(Keyframe::new(
        voiceover,
        narration,
        MediaKind::Voiceover,
        2000.0,
        5000.0,
    ))?;

    Ok(project)
}
