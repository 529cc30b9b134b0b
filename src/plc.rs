/// One generation result: the Structured Text program plus the textual
/// stand-in for the ladder diagram. Exactly one result is current at a time;
/// a new result fully replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    pub structured_text: String,
    pub ladder_summary: String,
}

impl GeneratedCode {
    /// Sample program shown before the first generation request.
    pub fn sample() -> Self {
        Self {
            structured_text: "\
PROGRAM MainProgram
VAR
    StartButton : BOOL := FALSE;
    StopButton : BOOL := FALSE;
    Motor1 : BOOL := FALSE;
    Timer1 : TON;
END_VAR

// Main logic
IF StartButton AND NOT StopButton THEN
    Motor1 := TRUE;
    Timer1(IN := Motor1, PT := T#5S);

    IF Timer1.Q THEN
        Motor1 := FALSE;
    END_IF;
ELSE
    Motor1 := FALSE;
    Timer1(IN := FALSE);
END_IF;

END_PROGRAM"
                .to_string(),
            ladder_summary: "Visual Ladder Diagram will be displayed here".to_string(),
        }
    }
}
